//! Per-kana spelling preferences used to bias the best-continuation search.
//!
//! A tendency never restricts what may be typed; it only decides which of the
//! valid romanizations is shown.

use std::collections::HashMap;

use serde::Deserialize;

use crate::keyconfig::KeyConfigTable;
use crate::unicode::MORAIC_N;

pub const DEFAULT_TENDENCY_TOML: &str = include_str!("default_tendency.toml");

/// Returns the embedded baseline tendency TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_TENDENCY_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum TendencyError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("empty preferred spelling for kana: {0}")]
    EmptySpelling(String),
    #[error("kana not in keyconfig table: {0}")]
    UnknownKana(String),
    #[error("spelling {spelling:?} is not valid for kana {kana}")]
    UnknownSpelling { kana: String, spelling: String },
}

#[derive(Deserialize)]
struct TendencyFile {
    #[serde(default)]
    preferred: HashMap<String, String>,
}

/// kana → preferred spelling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionTendency {
    preferred: HashMap<String, String>,
}

impl ConversionTendency {
    pub fn new() -> Self {
        Self::default()
    }

    /// The baseline a session starts from.
    pub fn baseline() -> Self {
        parse_tendency_toml(DEFAULT_TENDENCY_TOML).expect("baseline tendency TOML must be valid")
    }

    pub fn insert(&mut self, kana: impl Into<String>, spelling: impl Into<String>) {
        self.preferred.insert(kana.into(), spelling.into());
    }

    pub fn preferred(&self, kana: &str) -> Option<&str> {
        self.preferred.get(kana).map(String::as_str)
    }

    /// Search penalty of typing `kana` as `spelling`: 0 when preferred, else 1.
    pub fn penalty(&self, kana: &str, spelling: &str) -> u64 {
        u64::from(self.preferred(kana) != Some(spelling))
    }

    pub fn len(&self) -> usize {
        self.preferred.len()
    }

    pub fn is_empty(&self) -> bool {
        self.preferred.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.preferred
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check that every preference names a table kana and one of its
    /// spellings. ん additionally accepts the bare `n`.
    pub fn validate_against(&self, table: &KeyConfigTable) -> Result<(), TendencyError> {
        let mut kanas: Vec<&String> = self.preferred.keys().collect();
        kanas.sort();
        for kana in kanas {
            let spelling = &self.preferred[kana];
            let entry = table
                .lookup_by_kana(kana)
                .ok_or_else(|| TendencyError::UnknownKana(kana.clone()))?;
            let bare_n = *kana == MORAIC_N && *spelling == "n";
            if !bare_n && !entry.spellings.contains(spelling) {
                return Err(TendencyError::UnknownSpelling {
                    kana: kana.clone(),
                    spelling: spelling.clone(),
                });
            }
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConversionTendency {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            preferred: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

pub fn parse_tendency_toml(toml_str: &str) -> Result<ConversionTendency, TendencyError> {
    let file: TendencyFile =
        toml::from_str(toml_str).map_err(|e| TendencyError::Parse(e.to_string()))?;
    if let Some((kana, _)) = file.preferred.iter().find(|(_, v)| v.is_empty()) {
        return Err(TendencyError::EmptySpelling(kana.clone()));
    }
    Ok(ConversionTendency {
        preferred: file.preferred,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_toml() {
        let toml = r#"
[preferred]
"し" = "shi"
"つ" = "tsu"
"#;
        let t = parse_tendency_toml(toml).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.preferred("し"), Some("shi"));
        assert_eq!(t.preferred("か"), None);
    }

    #[test]
    fn parse_missing_section_is_empty() {
        let t = parse_tendency_toml("").unwrap();
        assert!(t.is_empty());
    }

    #[test]
    fn error_empty_spelling() {
        let toml = "[preferred]\n\"し\" = \"\"\n";
        let err = parse_tendency_toml(toml).unwrap_err();
        assert!(matches!(err, TendencyError::EmptySpelling(ref k) if k == "し"));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_tendency_toml("[preferred\n").unwrap_err();
        assert!(matches!(err, TendencyError::Parse(_)));
    }

    #[test]
    fn baseline_is_valid_for_default_table() {
        let t = ConversionTendency::baseline();
        assert_eq!(t.preferred("し"), Some("shi"));
        assert_eq!(t.preferred("ん"), None);
        t.validate_against(KeyConfigTable::global()).unwrap();
    }

    #[test]
    fn penalty_prefers_named_spelling() {
        let t: ConversionTendency = [("し", "shi")].into_iter().collect();
        assert_eq!(t.penalty("し", "shi"), 0);
        assert_eq!(t.penalty("し", "si"), 1);
        // No preference: every spelling costs the same.
        assert_eq!(t.penalty("か", "ka"), 1);
        assert_eq!(t.penalty("か", "ca"), 1);
    }

    #[test]
    fn validate_unknown_kana() {
        let t: ConversionTendency = [("漢", "kan")].into_iter().collect();
        let err = t.validate_against(KeyConfigTable::global()).unwrap_err();
        assert!(matches!(err, TendencyError::UnknownKana(_)));
    }

    #[test]
    fn validate_unknown_spelling() {
        let t: ConversionTendency = [("し", "xi")].into_iter().collect();
        let err = t.validate_against(KeyConfigTable::global()).unwrap_err();
        assert!(matches!(err, TendencyError::UnknownSpelling { .. }));
    }

    #[test]
    fn validate_accepts_bare_n() {
        let t: ConversionTendency = [("ん", "n")].into_iter().collect();
        t.validate_against(KeyConfigTable::global()).unwrap();
    }
}
