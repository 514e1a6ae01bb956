use serde::Serialize;

use crate::basic::basic_romaji_with;
use crate::keyconfig::KeyConfigTable;
use crate::predict::{predict_in, status_in, InputStatus, KeyPrediction};
use crate::search::search_in;
use crate::settings::Settings;
use crate::slot::{OptionKind, SlotKind, Slots};
use crate::tendency::ConversionTendency;

/// Full diagnostic result for one (reading, input) pair.
#[derive(Debug, Serialize)]
pub struct ExplainResult {
    pub reading: String,
    pub input: String,
    pub status: InputStatus,
    pub slots: Vec<ExplainSlot>,
    pub predictions: Vec<KeyPrediction>,
    pub best: String,
    /// The search found nothing and `best` is the basic romanization.
    pub fallback: bool,
    pub candidates: usize,
    pub visits: usize,
    pub truncated: bool,
}

/// One unit of the reading along its longest-match segmentation.
#[derive(Debug, Serialize)]
pub struct ExplainSlot {
    pub position: usize,
    pub token: String,
    pub kind: SlotKind,
    pub options: Vec<ExplainOption>,
}

#[derive(Debug, Serialize)]
pub struct ExplainOption {
    pub spelling: String,
    pub kind: OptionKind,
    /// Search penalty under the given tendency.
    pub penalty: u64,
}

pub fn explain(
    table: &KeyConfigTable,
    settings: &Settings,
    tendency: &ConversionTendency,
    reading: &str,
    input: &str,
) -> ExplainResult {
    let slots = Slots::new(table, reading);

    let mut explained = Vec::new();
    let mut pos = 0;
    while let Some(slot) = slots.slot_at(pos) {
        let token = slots.token_at(pos);
        let options = slots
            .options_at(pos)
            .iter()
            .map(|o| ExplainOption {
                spelling: o.spelling.to_string(),
                kind: o.kind,
                penalty: match o.kind {
                    OptionKind::Literal => 0,
                    OptionKind::Doubled => u64::from(tendency.preferred(&token).is_some()),
                    _ => tendency.penalty(o.origin.unwrap_or(&token), &o.spelling),
                },
            })
            .collect();
        explained.push(ExplainSlot {
            position: pos,
            token,
            kind: slot.kind(),
            options,
        });
        pos += slot.len();
    }

    let outcome = search_in(&slots, &settings.search, tendency, input);
    let fallback = outcome.best.is_none();
    let best = match outcome.best {
        Some(c) => c.output,
        None => basic_romaji_with(table, reading),
    };

    ExplainResult {
        reading: reading.to_string(),
        input: input.to_string(),
        status: status_in(&slots, input),
        slots: explained,
        predictions: predict_in(&slots, input),
        best,
        fallback,
        candidates: outcome.candidates,
        visits: outcome.visits,
        truncated: outcome.truncated,
    }
}

/// Format an ExplainResult as human-readable text.
pub fn format_text(result: &ExplainResult) -> String {
    use unicode_width::UnicodeWidthStr;
    let mut out = String::new();

    out.push_str(&format!(
        "=== Slots for \"{}\" ({} units) ===\n",
        result.reading,
        result.slots.len(),
    ));
    for slot in &result.slots {
        let pad_width = 6;
        let display_width = UnicodeWidthStr::width(slot.token.as_str());
        let padded = if display_width < pad_width {
            format!("{}{}", slot.token, " ".repeat(pad_width - display_width))
        } else {
            slot.token.clone()
        };
        let options: Vec<String> = slot
            .options
            .iter()
            .map(|o| match o.kind {
                OptionKind::Doubled => format!("{}(double)+{}", o.spelling, o.penalty),
                _ => format!("{}+{}", o.spelling, o.penalty),
            })
            .collect();
        out.push_str(&format!(
            "  [{:>3}] {} {:<9} {}\n",
            slot.position,
            padded,
            format!("{:?}", slot.kind),
            options.join(" "),
        ));
    }

    out.push_str(&format!(
        "\n=== Input \"{}\" ({:?}) ===\n",
        result.input, result.status
    ));
    if result.predictions.is_empty() {
        out.push_str("  next: (none)\n");
    } else {
        let next: Vec<String> = result
            .predictions
            .iter()
            .map(|p| match &p.origin_kana {
                Some(kana) => format!("{}({})", p.letter, kana),
                None => p.letter.to_string(),
            })
            .collect();
        out.push_str(&format!("  next: {}\n", next.join(" ")));
    }

    out.push_str(&format!(
        "\n=== Best ===\n  {}{}\n  candidates={} visits={}{}\n",
        result.best,
        if result.fallback { "  (fallback)" } else { "" },
        result.candidates,
        result.visits,
        if result.truncated { " (truncated)" } else { "" },
    ));

    out
}
