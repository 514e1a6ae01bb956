//! Next-keystroke prediction.
//!
//! Replays the typed romaji over every decomposition of the reading at once
//! (a set of states, not a single path) and reports which letters may come
//! next.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, debug_span};

use crate::keyconfig::KeyConfigTable;
use crate::slot::{KanaOption, OptionKind, Slots};
use crate::unicode::is_kana_token;

/// A letter the player may type next.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct KeyPrediction {
    pub letter: char,
    /// Kana token (or table symbol) the letter belongs to; `None` for
    /// pass-through chars.
    pub origin_kana: Option<String>,
    /// Whether the origin is kana script rather than a symbol or literal.
    pub is_recognized_kana: bool,
}

/// Where the typed input stands relative to the reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputStatus {
    /// The input types the whole reading.
    Complete,
    /// The input is a valid prefix with more to type.
    InProgress,
    /// No decomposition of the reading starts with the input.
    Diverged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SearchState<'s> {
    position: usize,
    /// Rest of the spelling currently being typed.
    buffer: &'s str,
    origin: Option<&'s str>,
    /// Letter doubled for a っ; the next kana must be spelled starting with it.
    doubled: Option<char>,
}

impl SearchState<'_> {
    fn is_done(&self, len: usize) -> bool {
        self.buffer.is_empty() && self.position >= len
    }

    /// Whether `opt` may start at this state's position. After a doubled
    /// letter only spellings repeating it remain (っか is "kka", never "kca").
    fn allows(&self, opt: &KanaOption<'_>) -> bool {
        self.doubled.map_or(true, |c| opt.first_char() == Some(c))
    }
}

/// Letters that may follow `input` while typing `reading`, using the global
/// table. Empty when the reading is fully typed or the input has diverged;
/// tell the two apart with [`input_status`].
pub fn predict_next(reading: &str, input: &str) -> Vec<KeyPrediction> {
    predict_next_with(KeyConfigTable::global(), reading, input)
}

pub fn predict_next_with(
    table: &KeyConfigTable,
    reading: &str,
    input: &str,
) -> Vec<KeyPrediction> {
    let slots = Slots::new(table, reading);
    predict_in(&slots, input)
}

pub fn input_status(reading: &str, input: &str) -> InputStatus {
    input_status_with(KeyConfigTable::global(), reading, input)
}

pub fn input_status_with(table: &KeyConfigTable, reading: &str, input: &str) -> InputStatus {
    let slots = Slots::new(table, reading);
    status_in(&slots, input)
}

pub(crate) fn status_in(slots: &Slots, input: &str) -> InputStatus {
    let states = replay(slots, input);
    if states.iter().any(|s| s.is_done(slots.len())) {
        InputStatus::Complete
    } else if states.is_empty() {
        InputStatus::Diverged
    } else {
        InputStatus::InProgress
    }
}

pub(crate) fn predict_in<'s>(slots: &'s Slots, input: &str) -> Vec<KeyPrediction> {
    let _span = debug_span!("predict_next", reading_len = slots.len(), input_len = input.len())
        .entered();

    let states = replay(slots, input);
    if states.iter().any(|s| s.is_done(slots.len())) {
        debug!("reading fully typed");
        return Vec::new();
    }

    let mut seen: HashSet<(char, Option<&'s str>)> = HashSet::new();
    let mut out = Vec::new();
    let mut push = |letter: char, origin: Option<&'s str>| {
        if seen.insert((letter, origin)) {
            out.push(KeyPrediction {
                letter,
                origin_kana: origin.map(str::to_string),
                is_recognized_kana: origin.is_some_and(is_kana_token),
            });
        }
    };

    for state in &states {
        if let Some(letter) = state.buffer.chars().next() {
            push(letter, state.origin);
            continue;
        }
        for opt in slots.options_at(state.position).iter().filter(|o| state.allows(o)) {
            if let Some(letter) = opt.first_char() {
                push(letter, opt.origin);
            }
        }
    }

    debug!(states = states.len(), predictions = out.len());
    out
}

/// Feed `input` one char at a time through every live state.
fn replay<'s>(slots: &'s Slots, input: &str) -> Vec<SearchState<'s>> {
    let mut states = vec![SearchState {
        position: 0,
        buffer: "",
        origin: None,
        doubled: None,
    }];

    for ch in input.chars() {
        let mut seen = HashSet::new();
        let mut next = Vec::new();
        let mut keep = |state: SearchState<'s>| {
            if seen.insert(state) {
                next.push(state);
            }
        };

        for state in &states {
            if let Some(rest) = state.buffer.strip_prefix(ch) {
                keep(SearchState {
                    buffer: rest,
                    ..*state
                });
            } else if state.buffer.is_empty() {
                for opt in slots.options_at(state.position).iter().filter(|o| state.allows(o)) {
                    if let Some(rest) = opt.spelling.strip_prefix(ch) {
                        keep(SearchState {
                            position: state.position + opt.consumed,
                            buffer: rest,
                            origin: opt.origin,
                            doubled: (opt.kind == OptionKind::Doubled).then_some(ch),
                        });
                    }
                }
            }
        }

        states = next;
        if states.is_empty() {
            break;
        }
    }

    states
}
