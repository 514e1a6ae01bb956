use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use romatype_core::{best_romanization, predict_next, ConversionTendency};

static READINGS: &[(&str, &str)] = &[
    ("short", "きょう"),
    ("medium", "きょうはいいてんきですね"),
    ("long", "しんかんせんでとうきょうにいって、ちゃっとでしゃしんをおくった。"),
];

fn bench_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("typing/predict_next");
    for &(label, reading) in READINGS {
        let typed = best_romanization(&ConversionTendency::new(), reading, "");
        let half = &typed[..typed.len() / 2];
        group.bench_with_input(
            BenchmarkId::new(label, reading.chars().count()),
            &(reading, half),
            |b, &(reading, half)| {
                b.iter(|| predict_next(reading, half));
            },
        );
    }
    group.finish();
}

fn bench_best(c: &mut Criterion) {
    let tendency = ConversionTendency::baseline();
    let mut group = c.benchmark_group("typing/best_romanization");
    for &(label, reading) in READINGS {
        group.bench_with_input(
            BenchmarkId::new(label, reading.chars().count()),
            &reading,
            |b, &reading| {
                b.iter(|| best_romanization(&tendency, reading, ""));
            },
        );
    }
    group.finish();
}

fn bench_best_mid_line(c: &mut Criterion) {
    let tendency = ConversionTendency::baseline();
    let reading = READINGS[2].1;
    let typed = best_romanization(&tendency, reading, "");
    let mut group = c.benchmark_group("typing/best_mid_line");
    for frac in [4, 2, 1] {
        let input = &typed[..typed.len() / frac];
        group.bench_with_input(BenchmarkId::from_parameter(input.len()), &input, |b, &input| {
            b.iter(|| best_romanization(&tendency, reading, input));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_predict, bench_best, bench_best_mid_line);
criterion_main!(benches);
