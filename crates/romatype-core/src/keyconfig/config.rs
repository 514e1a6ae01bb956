use std::collections::HashSet;

use serde::Deserialize;

/// One kana token and the romaji spellings that type it.
///
/// `spellings[0]` is the canonical spelling.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeyConfig {
    pub kana: String,
    pub spellings: Vec<String>,
}

impl KeyConfig {
    pub fn canonical(&self) -> &str {
        &self.spellings[0]
    }

    /// Length of the kana token in chars.
    pub fn kana_len(&self) -> usize {
        self.kana.chars().count()
    }
}

#[derive(Deserialize)]
struct KeyConfigFile {
    keys: Vec<KeyConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum KeyConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("keys list is empty")]
    Empty,
    #[error("entry {0} has an empty kana")]
    EmptyKana(usize),
    #[error("duplicate kana: {0}")]
    DuplicateKana(String),
    #[error("no spellings for kana: {0}")]
    NoSpellings(String),
    #[error("invalid spelling {spelling:?} for kana {kana}: must be non-empty ASCII")]
    InvalidSpelling { kana: String, spelling: String },
    #[error("keyconfig table already initialized")]
    AlreadyInitialized,
}

/// Parse TOML text into the ordered list of key configs.
pub fn parse_keyconfig_toml(toml_str: &str) -> Result<Vec<KeyConfig>, KeyConfigError> {
    let file: KeyConfigFile =
        toml::from_str(toml_str).map_err(|e| KeyConfigError::Parse(e.to_string()))?;

    if file.keys.is_empty() {
        return Err(KeyConfigError::Empty);
    }

    let mut seen = HashSet::new();
    for (i, key) in file.keys.iter().enumerate() {
        if key.kana.is_empty() {
            return Err(KeyConfigError::EmptyKana(i));
        }
        if !seen.insert(key.kana.as_str()) {
            return Err(KeyConfigError::DuplicateKana(key.kana.clone()));
        }
        if key.spellings.is_empty() {
            return Err(KeyConfigError::NoSpellings(key.kana.clone()));
        }
        if let Some(bad) = key
            .spellings
            .iter()
            .find(|s| s.is_empty() || !s.is_ascii())
        {
            return Err(KeyConfigError::InvalidSpelling {
                kana: key.kana.clone(),
                spelling: bad.clone(),
            });
        }
    }

    Ok(file.keys)
}
