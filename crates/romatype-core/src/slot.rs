//! Per-position view of a reading: what kind of unit starts at each char
//! position and which romaji options can type it.
//!
//! っ and ん couple with the following position, so options are computed
//! lazily and memoized for the lifetime of one `Slots` (one engine call).

use std::borrow::Cow;
use std::cell::OnceCell;

use serde::Serialize;

use crate::keyconfig::{KeyConfig, KeyConfigTable};
use crate::unicode::{blocks_bare_n, is_doublable, MORAIC_N, SOKUON};

/// What occupies one position of the reading.
#[derive(Debug, Clone)]
pub enum Slot<'t> {
    /// A char the table does not cover; typed as itself.
    Literal(char),
    /// っ with the table's fixed spellings (ltu, xtu, ...).
    Sokuon { fixed: &'t [String] },
    /// ん with the table's fixed spellings (nn, n', xn).
    MoraicN { fixed: &'t [String] },
    /// Longest-match table entries at this position.
    Ordinary(Vec<&'t KeyConfig>),
}

impl Slot<'_> {
    /// Number of reading chars consumed by this slot.
    pub fn len(&self) -> usize {
        match self {
            Slot::Ordinary(entries) => entries.first().map_or(1, |k| k.kana_len()),
            _ => 1,
        }
    }

    pub fn kind(&self) -> SlotKind {
        match self {
            Slot::Literal(_) => SlotKind::Literal,
            Slot::Sokuon { .. } => SlotKind::Sokuon,
            Slot::MoraicN { .. } => SlotKind::MoraicN,
            Slot::Ordinary(_) => SlotKind::Ordinary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    Literal,
    Sokuon,
    MoraicN,
    Ordinary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    /// A spelling listed in the table.
    Spelling,
    /// っ typed by doubling the next kana's first consonant.
    Doubled,
    /// ん typed as a single `n`.
    BareN,
    /// A pass-through char.
    Literal,
}

/// One way to start typing at a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanaOption<'t> {
    pub spelling: Cow<'t, str>,
    /// Reading chars consumed once `spelling` is fully typed.
    pub consumed: usize,
    /// Kana token (or table symbol) being typed; `None` for literals.
    pub origin: Option<&'t str>,
    pub kind: OptionKind,
}

impl KanaOption<'_> {
    pub fn first_char(&self) -> Option<char> {
        self.spelling.chars().next()
    }
}

/// Lazily memoized slots, options and initial letters of one reading.
pub struct Slots<'t> {
    table: &'t KeyConfigTable,
    text: Vec<char>,
    slots: Vec<OnceCell<Slot<'t>>>,
    options: Vec<OnceCell<Vec<KanaOption<'t>>>>,
    initials: Vec<OnceCell<Vec<char>>>,
}

impl<'t> Slots<'t> {
    pub fn new(table: &'t KeyConfigTable, reading: &str) -> Self {
        let text: Vec<char> = reading.chars().collect();
        let n = text.len();
        Self {
            table,
            text,
            slots: (0..n).map(|_| OnceCell::new()).collect(),
            options: (0..n).map(|_| OnceCell::new()).collect(),
            initials: (0..n).map(|_| OnceCell::new()).collect(),
        }
    }

    /// Reading length in chars.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn text(&self) -> &[char] {
        &self.text
    }

    /// The reading chars covered by the slot at `pos`.
    pub fn token_at(&self, pos: usize) -> String {
        match self.slot_at(pos) {
            Some(slot) => self.text[pos..pos + slot.len()].iter().collect(),
            None => String::new(),
        }
    }

    /// Slot starting at `pos`; `None` at or past the end.
    pub fn slot_at(&self, pos: usize) -> Option<&Slot<'t>> {
        let cell = self.slots.get(pos)?;
        Some(cell.get_or_init(|| self.classify(pos)))
    }

    fn classify(&self, pos: usize) -> Slot<'t> {
        let c = self.text[pos];
        let fixed = |kana: &str| {
            self.table
                .lookup_by_kana(kana)
                .map_or(&[][..], |k| k.spellings.as_slice())
        };
        match c {
            'っ' => Slot::Sokuon {
                fixed: fixed(SOKUON),
            },
            'ん' => Slot::MoraicN {
                fixed: fixed(MORAIC_N),
            },
            _ => {
                let matches = self.table.longest_matches_at(&self.text, pos);
                if matches.is_empty() {
                    Slot::Literal(c)
                } else {
                    Slot::Ordinary(matches)
                }
            }
        }
    }

    /// Every option that can start typing at `pos`. Empty at the end.
    pub fn options_at(&self, pos: usize) -> &[KanaOption<'t>] {
        match self.options.get(pos) {
            Some(cell) => cell.get_or_init(|| self.compute_options(pos)),
            None => &[],
        }
    }

    fn compute_options(&self, pos: usize) -> Vec<KanaOption<'t>> {
        let Some(slot) = self.slot_at(pos) else {
            return Vec::new();
        };
        match slot {
            Slot::Literal(c) => vec![KanaOption {
                spelling: Cow::Owned(c.to_string()),
                consumed: 1,
                origin: None,
                kind: OptionKind::Literal,
            }],
            Slot::Ordinary(entries) => entries
                .iter()
                .flat_map(|&k| {
                    let consumed = k.kana_len();
                    k.spellings.iter().map(move |s| KanaOption {
                        spelling: Cow::Borrowed(s.as_str()),
                        consumed,
                        origin: Some(k.kana.as_str()),
                        kind: OptionKind::Spelling,
                    })
                })
                .collect(),
            Slot::Sokuon { fixed } => {
                let fixed: &'t [String] = *fixed;
                let mut out: Vec<KanaOption<'t>> = self
                    .doubling_initials(pos)
                    .into_iter()
                    .map(|c| KanaOption {
                        spelling: Cow::Owned(c.to_string()),
                        consumed: 1,
                        origin: Some(SOKUON),
                        kind: OptionKind::Doubled,
                    })
                    .collect();
                out.extend(fixed.iter().map(|s| special_option(s, SOKUON)));
                out
            }
            Slot::MoraicN { fixed } => {
                let fixed: &'t [String] = *fixed;
                let mut out = Vec::with_capacity(fixed.len() + 1);
                if self.bare_n_allowed(pos) {
                    out.push(KanaOption {
                        spelling: Cow::Borrowed("n"),
                        consumed: 1,
                        origin: Some(MORAIC_N),
                        kind: OptionKind::BareN,
                    });
                }
                out.extend(fixed.iter().map(|s| special_option(s, MORAIC_N)));
                out
            }
        }
    }

    /// Distinct first letters of the options at `pos`, in option order.
    pub fn initials_at(&self, pos: usize) -> &[char] {
        match self.initials.get(pos) {
            Some(cell) => cell.get_or_init(|| {
                let mut out = Vec::new();
                for c in self.options_at(pos).iter().filter_map(KanaOption::first_char) {
                    if !out.contains(&c) {
                        out.push(c);
                    }
                }
                out
            }),
            None => &[],
        }
    }

    /// Consonants that may be doubled for a っ at `pos`. Only an ordinary
    /// kana right after it can be geminated.
    pub fn doubling_initials(&self, pos: usize) -> Vec<char> {
        match self.slot_at(pos + 1) {
            Some(Slot::Ordinary(_)) => self
                .initials_at(pos + 1)
                .iter()
                .copied()
                .filter(|&c| is_doublable(c))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether a ん at `pos` may be typed as a single `n`: it is the last
    /// char, or nothing that follows can begin with a vowel, y or n.
    ///
    /// The follow set comes from the whole table; tendencies never narrow it.
    pub fn bare_n_allowed(&self, pos: usize) -> bool {
        if pos + 1 >= self.len() {
            return true;
        }
        !self.initials_at(pos + 1).iter().any(|&c| blocks_bare_n(c))
    }
}

fn special_option<'t>(spelling: &'t str, origin: &'static str) -> KanaOption<'t> {
    KanaOption {
        spelling: Cow::Borrowed(spelling),
        consumed: 1,
        origin: Some(origin),
        kind: OptionKind::Spelling,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spellings(slots: &Slots, pos: usize) -> Vec<String> {
        slots
            .options_at(pos)
            .iter()
            .map(|o| o.spelling.to_string())
            .collect()
    }

    #[test]
    fn test_classify() {
        let table = KeyConfigTable::global();
        let slots = Slots::new(table, "きゃっん漢");
        assert_eq!(slots.slot_at(0).unwrap().kind(), SlotKind::Ordinary);
        assert_eq!(slots.slot_at(0).unwrap().len(), 2);
        assert_eq!(slots.slot_at(2).unwrap().kind(), SlotKind::Sokuon);
        assert_eq!(slots.slot_at(3).unwrap().kind(), SlotKind::MoraicN);
        assert_eq!(slots.slot_at(4).unwrap().kind(), SlotKind::Literal);
        assert!(slots.slot_at(5).is_none());
        assert_eq!(slots.token_at(0), "きゃ");
    }

    #[test]
    fn test_ordinary_options_keep_table_order() {
        let table = KeyConfigTable::global();
        let slots = Slots::new(table, "し");
        assert_eq!(spellings(&slots, 0), vec!["si", "shi", "ci"]);
        assert!(slots
            .options_at(0)
            .iter()
            .all(|o| o.origin == Some("し") && o.consumed == 1));
    }

    #[test]
    fn test_literal_option() {
        let table = KeyConfigTable::global();
        let slots = Slots::new(table, "a");
        let opts = slots.options_at(0);
        assert_eq!(opts.len(), 1);
        assert_eq!(opts[0].spelling, "a");
        assert_eq!(opts[0].origin, None);
        assert_eq!(opts[0].kind, OptionKind::Literal);
    }

    #[test]
    fn test_sokuon_doubles_next_consonant() {
        let table = KeyConfigTable::global();
        let slots = Slots::new(table, "った");
        let opts = spellings(&slots, 0);
        assert_eq!(opts, vec!["t", "ltu", "xtu", "ltsu", "xtsu"]);
    }

    #[test]
    fn test_sokuon_doubles_every_initial() {
        let table = KeyConfigTable::global();
        let slots = Slots::new(table, "っち");
        assert_eq!(slots.doubling_initials(0), vec!['t', 'c']);
    }

    #[test]
    fn test_sokuon_never_doubles_vowel_or_n() {
        let table = KeyConfigTable::global();
        for reading in ["っあ", "っな", "っん", "っ", "っ!"] {
            let slots = Slots::new(table, reading);
            assert!(
                slots.doubling_initials(0).is_empty(),
                "unexpected doubling for {reading}"
            );
            assert_eq!(spellings(&slots, 0), vec!["ltu", "xtu", "ltsu", "xtsu"]);
        }
    }

    #[test]
    fn test_moraic_n_at_end_allows_bare_n() {
        let table = KeyConfigTable::global();
        let slots = Slots::new(table, "ん");
        assert_eq!(spellings(&slots, 0), vec!["n", "nn", "n'", "xn"]);
    }

    #[test]
    fn test_moraic_n_before_vowel_forbids_bare_n() {
        let table = KeyConfigTable::global();
        let slots = Slots::new(table, "んあ");
        assert_eq!(spellings(&slots, 0), vec!["nn", "n'", "xn"]);
    }

    #[test]
    fn test_moraic_n_before_y_or_n_forbids_bare_n() {
        let table = KeyConfigTable::global();
        for reading in ["んや", "んな", "んにゃ", "んん"] {
            let slots = Slots::new(table, reading);
            assert!(!slots.bare_n_allowed(0), "bare n allowed in {reading}");
        }
    }

    #[test]
    fn test_moraic_n_before_consonant_allows_bare_n() {
        let table = KeyConfigTable::global();
        for reading in ["んか", "んしゃ", "んっ", "ん、", "ん!"] {
            let slots = Slots::new(table, reading);
            assert!(slots.bare_n_allowed(0), "bare n forbidden in {reading}");
        }
    }

    #[test]
    fn test_missing_special_entries_leave_rules_intact() {
        let table =
            KeyConfigTable::from_toml(r#"keys = [ { kana = "か", spellings = ["ka"] } ]"#).unwrap();
        let slots = Slots::new(&table, "っかん");
        assert_eq!(spellings(&slots, 0), vec!["k"]);
        assert_eq!(spellings(&slots, 2), vec!["n"]);
    }
}
