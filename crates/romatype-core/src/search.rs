//! Best full romanization of a reading, consistent with what has been typed.
//!
//! A DFS walks the reading while the partial output still overlaps the typed
//! input. Past the input, the cheapest completion from a (position, pending
//! doubling) pair no longer depends on the path, so it is memoized. Each
//! candidate is scored `penalty * weight + extra_len`; equal scores keep the
//! first candidate in table spelling order.

use std::borrow::Cow;
use std::collections::HashMap;

use tracing::{debug, debug_span, warn};

use crate::basic::basic_romaji_with;
use crate::keyconfig::KeyConfigTable;
use crate::settings::{settings, SearchSettings, Settings};
use crate::slot::{Slot, Slots};
use crate::tendency::ConversionTendency;
use crate::unicode::{is_doublable, SOKUON};

/// A complete romanization reached by the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub output: String,
    /// Number of spellings that are not the tendency's preference.
    pub non_preferred_count: u64,
}

/// Result of one search, with counters for diagnostics.
#[derive(Debug, Clone)]
pub(crate) struct SearchOutcome {
    pub best: Option<Candidate>,
    pub candidates: usize,
    pub visits: usize,
    pub truncated: bool,
}

/// Best romanization of `reading` that starts with `input`, using the global
/// table and settings. Falls back to [`basic_romaji`](crate::basic_romaji) of
/// the whole reading when `input` fits no decomposition.
pub fn best_romanization(tendency: &ConversionTendency, reading: &str, input: &str) -> String {
    best_romanization_with(KeyConfigTable::global(), settings(), tendency, reading, input)
}

pub fn best_romanization_with(
    table: &KeyConfigTable,
    settings: &Settings,
    tendency: &ConversionTendency,
    reading: &str,
    input: &str,
) -> String {
    let slots = Slots::new(table, reading);
    match search_in(&slots, &settings.search, tendency, input).best {
        Some(c) => c.output,
        None => basic_romaji_with(table, reading),
    }
}

/// The part of the best romanization still to be typed. Empty when the
/// input is not a prefix of it (including the fallback case).
pub fn remaining_romanization(
    tendency: &ConversionTendency,
    reading: &str,
    input: &str,
) -> String {
    let best = best_romanization(tendency, reading, input);
    best.strip_prefix(input).unwrap_or_default().to_string()
}

pub(crate) fn search_in(
    slots: &Slots,
    config: &SearchSettings,
    tendency: &ConversionTendency,
    input: &str,
) -> SearchOutcome {
    let _span = debug_span!("best_romanization", reading_len = slots.len(), input_len = input.len())
        .entered();

    let mut search = Search {
        slots,
        tendency,
        input,
        weight: config.penalty_weight,
        max_visits: config.max_visits,
        visits: 0,
        truncated: false,
        memo: HashMap::new(),
        best: None,
        candidates: 0,
    };
    let mut output = String::new();
    search.dfs(0, false, &mut output, 0);

    if search.truncated {
        warn!(visits = search.visits, "search visit cap reached");
    }
    debug!(
        candidates = search.candidates,
        visits = search.visits,
        found = search.best.is_some()
    );

    SearchOutcome {
        best: search.best.map(|(_, c)| c),
        candidates: search.candidates,
        visits: search.visits,
        truncated: search.truncated,
    }
}

/// One way to advance from a position.
struct Branch<'s> {
    piece: Cow<'s, str>,
    penalty: u64,
    next: usize,
    /// っ was typed by doubling; the next kana must start with a consonant.
    pending: bool,
}

/// Cheapest completion from some (position, pending) pair.
#[derive(Debug, Clone)]
struct Suffix {
    penalty: u64,
    text: String,
}

struct Search<'a, 't> {
    slots: &'a Slots<'t>,
    tendency: &'a ConversionTendency,
    input: &'a str,
    weight: u64,
    max_visits: usize,
    visits: usize,
    truncated: bool,
    memo: HashMap<(usize, bool), Option<Suffix>>,
    best: Option<(u64, Candidate)>,
    candidates: usize,
}

impl<'a> Search<'a, '_> {
    fn score(&self, penalty: u64, len: usize) -> u64 {
        penalty
            .saturating_mul(self.weight)
            .saturating_add(len.saturating_sub(self.input.len()) as u64)
    }

    fn visit(&mut self) -> bool {
        self.visits += 1;
        if self.visits > self.max_visits {
            self.truncated = true;
        }
        !self.truncated
    }

    /// Both strings agree on their common length.
    fn prefix_matches(&self, output: &str) -> bool {
        output.starts_with(self.input) || self.input.starts_with(output)
    }

    fn dfs(&mut self, pos: usize, pending: bool, output: &mut String, penalty: u64) {
        if !self.visit() {
            return;
        }

        if output.len() >= self.input.len() {
            // The input is now a prefix of the output; only the tail is free.
            if let Some(suffix) = self.best_suffix(pos, pending) {
                let mut full = String::with_capacity(output.len() + suffix.text.len());
                full.push_str(output);
                full.push_str(&suffix.text);
                self.offer(full, penalty + suffix.penalty);
            }
            return;
        }

        for branch in self.branches(pos, pending) {
            let mark = output.len();
            output.push_str(&branch.piece);
            if self.prefix_matches(output) {
                self.dfs(
                    branch.next,
                    branch.pending,
                    output,
                    penalty + branch.penalty,
                );
            }
            output.truncate(mark);
            if self.truncated {
                return;
            }
        }
    }

    fn offer(&mut self, output: String, penalty: u64) {
        self.candidates += 1;
        let score = self.score(penalty, output.len());
        if self.best.as_ref().map_or(true, |(best, _)| score < *best) {
            self.best = Some((
                score,
                Candidate {
                    output,
                    non_preferred_count: penalty,
                },
            ));
        }
    }

    fn best_suffix(&mut self, pos: usize, pending: bool) -> Option<Suffix> {
        if pos >= self.slots.len() {
            return (!pending).then(|| Suffix {
                penalty: 0,
                text: String::new(),
            });
        }
        if let Some(hit) = self.memo.get(&(pos, pending)) {
            return hit.clone();
        }
        if !self.visit() {
            return None;
        }

        let mut best: Option<(u64, Suffix)> = None;
        for branch in self.branches(pos, pending) {
            let Some(rest) = self.best_suffix(branch.next, branch.pending) else {
                continue;
            };
            let penalty = branch.penalty + rest.penalty;
            let len = branch.piece.len() + rest.text.len();
            let score = penalty.saturating_mul(self.weight).saturating_add(len as u64);
            if best.as_ref().map_or(true, |(b, _)| score < *b) {
                let mut text = String::with_capacity(len);
                text.push_str(&branch.piece);
                text.push_str(&rest.text);
                best = Some((score, Suffix { penalty, text }));
            }
        }

        let result = best.map(|(_, s)| s);
        if !self.truncated {
            self.memo.insert((pos, pending), result.clone());
        }
        result
    }

    fn branches(&self, pos: usize, pending: bool) -> Vec<Branch<'a>> {
        let slots: &'a Slots = self.slots;
        let tendency = self.tendency;
        let Some(slot) = slots.slot_at(pos) else {
            return Vec::new();
        };

        match slot {
            Slot::Ordinary(entries) => {
                let mut out = Vec::new();
                for &k in entries {
                    let next = pos + k.kana_len();
                    for s in &k.spellings {
                        let piece = if pending {
                            match s.chars().next() {
                                Some(c) if is_doublable(c) => {
                                    let mut doubled = String::with_capacity(s.len() + 1);
                                    doubled.push(c);
                                    doubled.push_str(s);
                                    Cow::Owned(doubled)
                                }
                                _ => continue,
                            }
                        } else {
                            Cow::Borrowed(s.as_str())
                        };
                        out.push(Branch {
                            piece,
                            penalty: tendency.penalty(&k.kana, s),
                            next,
                            pending: false,
                        });
                    }
                }
                out
            }
            // A doubled consonant can only precede an ordinary kana.
            _ if pending => Vec::new(),
            Slot::Literal(c) => vec![Branch {
                piece: Cow::Owned(c.to_string()),
                penalty: 0,
                next: pos + 1,
                pending: false,
            }],
            Slot::Sokuon { fixed } => {
                let mut out = Vec::with_capacity(fixed.len() + 1);
                if !slots.doubling_initials(pos).is_empty() {
                    out.push(Branch {
                        piece: Cow::Borrowed(""),
                        penalty: u64::from(tendency.preferred(SOKUON).is_some()),
                        next: pos + 1,
                        pending: true,
                    });
                }
                out.extend(fixed.iter().map(|s| Branch {
                    piece: Cow::Borrowed(s.as_str()),
                    penalty: tendency.penalty(SOKUON, s),
                    next: pos + 1,
                    pending: false,
                }));
                out
            }
            Slot::MoraicN { .. } => slots
                .options_at(pos)
                .iter()
                .map(|opt| Branch {
                    piece: Cow::Borrowed(&*opt.spelling),
                    penalty: tendency.penalty(opt.origin.unwrap_or_default(), &opt.spelling),
                    next: pos + 1,
                    pending: false,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn none() -> ConversionTendency {
        ConversionTendency::new()
    }

    fn prefer(pairs: &[(&str, &str)]) -> ConversionTendency {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_single_kana() {
        assert_eq!(best_romanization(&none(), "か", ""), "ka");
    }

    #[test]
    fn test_tendency_overrides_table_order() {
        assert_eq!(best_romanization(&none(), "し", ""), "si");
        assert_eq!(best_romanization(&prefer(&[("し", "shi")]), "し", ""), "shi");
    }

    #[test]
    fn test_typed_prefix_wins_over_tendency() {
        let r = best_romanization(&prefer(&[("し", "shi")]), "し", "sh");
        assert!(r.starts_with("shi"), "got {r}");
        assert_eq!(best_romanization(&prefer(&[("し", "shi")]), "し", "si"), "si");
    }

    #[test]
    fn test_tsuki_follows_typed_spelling() {
        assert_eq!(best_romanization(&none(), "つき", "tu"), "tuki");
        assert_eq!(best_romanization(&none(), "つき", "ts"), "tsuki");
        assert_eq!(best_romanization(&none(), "つき", ""), "tuki");
    }

    #[test]
    fn test_diverged_input_falls_back() {
        let t = prefer(&[("し", "shi")]);
        assert_eq!(best_romanization(&t, "しか", "sk"), "sika");
        assert_eq!(best_romanization(&t, "しか", "sk"), crate::basic_romaji("しか"));
    }

    #[test]
    fn test_sokuon_prefers_doubling() {
        assert_eq!(best_romanization(&none(), "った", ""), "tta");
        assert_eq!(best_romanization(&none(), "きって", ""), "kitte");
        assert_eq!(best_romanization(&none(), "っ", ""), "ltu");
    }

    #[test]
    fn test_sokuon_follows_typed_fixed_spelling() {
        assert_eq!(best_romanization(&none(), "った", "x"), "xtuta");
        assert_eq!(best_romanization(&none(), "った", "xts"), "xtsuta");
    }

    #[test]
    fn test_sokuon_tendency_for_fixed_spelling() {
        let t = prefer(&[("っ", "xtu")]);
        assert_eq!(best_romanization(&t, "った", ""), "xtuta");
        // Typing the doubled consonant still leads to the doubled form.
        assert_eq!(best_romanization(&t, "った", "t"), "tta");
    }

    #[test]
    fn test_sokuon_doubles_every_spelling_family() {
        assert_eq!(best_romanization(&none(), "っち", ""), "tti");
        assert_eq!(best_romanization(&none(), "っち", "c"), "cchi");
        assert_eq!(best_romanization(&prefer(&[("ち", "chi")]), "っち", ""), "cchi");
    }

    #[test]
    fn test_sokuon_before_vowel_uses_fixed() {
        assert_eq!(best_romanization(&none(), "っあ", ""), "ltua");
    }

    #[test]
    fn test_moraic_n() {
        assert_eq!(best_romanization(&none(), "ん", ""), "n");
        assert_eq!(best_romanization(&none(), "んあ", ""), "nna");
        assert_eq!(best_romanization(&none(), "こんにちは", ""), "konnnitiha");
        assert_eq!(best_romanization(&none(), "しんかんせん", ""), "sinkansen");
    }

    #[test]
    fn test_moraic_n_tendency() {
        let t = prefer(&[("ん", "nn")]);
        assert_eq!(best_romanization(&t, "ん", ""), "nn");
        assert_eq!(best_romanization(&t, "かんか", ""), "kannka");
    }

    #[test]
    fn test_moraic_n_typed_alternative() {
        assert_eq!(best_romanization(&none(), "しんかんせん", "shinnk"), "shinnkansen");
        assert_eq!(best_romanization(&none(), "こんにちは", "kon'"), "kon'nitiha");
        assert_eq!(best_romanization(&none(), "こんにちは", "kon"), "konnnitiha");
    }

    #[test]
    fn test_baseline_tendency() {
        let t = ConversionTendency::baseline();
        assert_eq!(best_romanization(&t, "しんかんせん", ""), "shinkansen");
        assert_eq!(best_romanization(&t, "ちゃっと", ""), "chatto");
        assert_eq!(best_romanization(&t, "ふじさん", ""), "fujisan");
    }

    #[test]
    fn test_literal_passthrough() {
        assert_eq!(best_romanization(&none(), "abcか", ""), "abcka");
        assert_eq!(best_romanization(&none(), "abcか", "abc"), "abcka");
    }

    #[test]
    fn test_tie_breaks_on_spelling_order() {
        // ka and ca cost the same and have the same length.
        assert_eq!(best_romanization(&none(), "かか", ""), "kaka");
        assert_eq!(best_romanization(&none(), "かか", "kac"), "kaca");
    }

    #[test]
    fn test_empty_reading() {
        assert_eq!(best_romanization(&none(), "", ""), "");
        assert_eq!(best_romanization(&none(), "", "a"), "");
    }

    #[test]
    fn test_fully_typed_returns_input() {
        assert_eq!(best_romanization(&none(), "しゃしん", "shixyasin"), "shixyasin");
    }

    #[test]
    fn test_remaining_romanization() {
        let t = prefer(&[("し", "shi")]);
        assert_eq!(remaining_romanization(&t, "しか", "sh"), "ika");
        assert_eq!(remaining_romanization(&t, "しか", ""), "shika");
        assert_eq!(remaining_romanization(&t, "しか", "shika"), "");
        assert_eq!(remaining_romanization(&t, "しか", "q"), "");
    }

    #[test]
    fn test_visit_cap_falls_back() {
        let table = KeyConfigTable::global();
        let tight = crate::settings::parse_settings_toml(
            "[search]\npenalty_weight = 10000\nmax_visits = 1\n",
        )
        .unwrap();
        let r = best_romanization_with(table, &tight, &none(), "し", "sh");
        assert_eq!(r, "si");
    }

    #[test]
    fn test_long_line_stays_bounded() {
        let reading = "しゅうしょくかつどうちゅうのしょうしゃしゃいんはちょっとしんちょうにしゃべった".repeat(4);
        let slots = Slots::new(KeyConfigTable::global(), &reading);
        let outcome = search_in(&slots, &settings().search, &none(), "");
        assert!(!outcome.truncated);
        assert!(outcome.best.is_some());
        assert!(outcome.visits < 10_000, "visits = {}", outcome.visits);
    }

    #[test]
    fn test_non_preferred_count() {
        let slots = Slots::new(KeyConfigTable::global(), "しか");
        let t = prefer(&[("し", "shi")]);
        let outcome = search_in(&slots, &settings().search, &t, "");
        let best = outcome.best.unwrap();
        assert_eq!(best.output, "shika");
        assert_eq!(best.non_preferred_count, 1);
    }
}
