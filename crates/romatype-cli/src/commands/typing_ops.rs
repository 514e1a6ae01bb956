use std::process;

use serde::Serialize;

use romatype_core::explain;
use romatype_core::settings::settings;
use romatype_core::{
    basic_romaji, best_romanization, input_status, predict_next, remaining_romanization,
    ConversionTendency, InputStatus, KeyConfigTable, KeyPrediction,
};

use super::load_tendency;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Debug, Serialize)]
struct PredictReport<'a> {
    reading: &'a str,
    input: &'a str,
    status: InputStatus,
    predictions: Vec<KeyPrediction>,
}

#[derive(Debug, Serialize)]
struct BestReport<'a> {
    reading: &'a str,
    input: &'a str,
    status: InputStatus,
    best: String,
    remaining: String,
}

/// State of the line after one simulated keystroke.
#[derive(Debug, Serialize)]
pub struct SimulateStep {
    pub typed: String,
    pub status: InputStatus,
    pub next: Vec<char>,
    pub remaining: String,
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        die!(serde_json::to_string_pretty(value), "JSON serialization failed: {}")
    );
}

fn format_predictions(predictions: &[KeyPrediction]) -> String {
    if predictions.is_empty() {
        return "(none)".to_string();
    }
    predictions
        .iter()
        .map(|p| match &p.origin_kana {
            Some(kana) if p.is_recognized_kana => format!("{}({})", p.letter, kana),
            Some(symbol) => format!("{}[{}]", p.letter, symbol),
            None => p.letter.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn predict_cmd(reading: &str, input: &str, json: bool) {
    let predictions = predict_next(reading, input);
    let status = input_status(reading, input);
    if json {
        print_json(&PredictReport {
            reading,
            input,
            status,
            predictions,
        });
    } else {
        println!("{:?}: {}", status, format_predictions(&predictions));
    }
}

pub fn best_cmd(
    reading: &str,
    input: &str,
    tendency_file: Option<&str>,
    baseline: bool,
    json: bool,
) {
    let tendency = die!(load_tendency(tendency_file, baseline), "Error: {}");
    let best = best_romanization(&tendency, reading, input);
    let remaining = remaining_romanization(&tendency, reading, input);
    let status = input_status(reading, input);
    if json {
        print_json(&BestReport {
            reading,
            input,
            status,
            best,
            remaining,
        });
    } else {
        println!("{best}");
        if !input.is_empty() {
            println!("remaining: {remaining} ({status:?})");
        }
    }
}

pub fn basic_cmd(reading: &str) {
    println!("{}", basic_romaji(reading));
}

pub fn explain_cmd(
    reading: &str,
    input: &str,
    tendency_file: Option<&str>,
    baseline: bool,
    json: bool,
) {
    let tendency = die!(load_tendency(tendency_file, baseline), "Error: {}");
    let result = explain::explain(
        KeyConfigTable::global(),
        settings(),
        &tendency,
        reading,
        input,
    );
    if json {
        print_json(&result);
    } else {
        print!("{}", explain::format_text(&result));
    }
}

/// Type the best romanization of `reading` one key at a time.
pub fn simulate(tendency: &ConversionTendency, reading: &str) -> Vec<SimulateStep> {
    let target = best_romanization(tendency, reading, "");
    let mut typed = String::new();
    let mut steps = Vec::with_capacity(target.chars().count() + 1);
    let mut keys = target.chars();
    loop {
        steps.push(SimulateStep {
            typed: typed.clone(),
            status: input_status(reading, &typed),
            next: predict_next(reading, &typed)
                .iter()
                .map(|p| p.letter)
                .collect(),
            remaining: remaining_romanization(tendency, reading, &typed),
        });
        match keys.next() {
            Some(c) => typed.push(c),
            None => break,
        }
    }
    steps
}

pub fn simulate_cmd(reading: &str, tendency_file: Option<&str>, baseline: bool, json: bool) {
    let tendency = die!(load_tendency(tendency_file, baseline), "Error: {}");
    let steps = simulate(&tendency, reading);
    if json {
        print_json(&steps);
        return;
    }
    let width = steps.last().map_or(0, |s| s.typed.chars().count());
    for step in &steps {
        let next: String = step.next.iter().collect();
        println!(
            "{:<width$} | {:<10} | next: {:<8} | {}",
            step.typed,
            format!("{:?}", step.status),
            next,
            step.remaining,
        );
    }
}
