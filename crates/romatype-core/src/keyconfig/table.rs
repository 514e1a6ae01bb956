use std::collections::HashMap;
use std::sync::OnceLock;

use super::config::{parse_keyconfig_toml, KeyConfig, KeyConfigError};

pub const DEFAULT_TOML: &str = include_str!("default_keyconfig.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Returns the embedded default keyconfig TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_TOML
}

/// Kana → spellings table with a by-kana index.
#[derive(Debug)]
pub struct KeyConfigTable {
    entries: Vec<KeyConfig>,
    by_kana: HashMap<String, usize>,
    max_kana_len: usize,
}

impl KeyConfigTable {
    /// Set custom TOML before first `global()` call.
    pub fn init_custom(toml_content: String) -> Result<(), KeyConfigError> {
        // Validate eagerly
        parse_keyconfig_toml(&toml_content)?;
        CUSTOM_TOML
            .set(toml_content)
            .map_err(|_| KeyConfigError::AlreadyInitialized)
    }

    /// Get or initialize the global singleton.
    pub fn global() -> &'static KeyConfigTable {
        static INSTANCE: OnceLock<KeyConfigTable> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            let toml_str = CUSTOM_TOML
                .get()
                .map(|s| s.as_str())
                .unwrap_or(DEFAULT_TOML);
            KeyConfigTable::from_toml(toml_str).expect("keyconfig TOML must be valid")
        })
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, KeyConfigError> {
        Ok(Self::from_entries(parse_keyconfig_toml(toml_str)?))
    }

    /// Build from already-validated entries.
    pub fn from_entries(entries: Vec<KeyConfig>) -> Self {
        let by_kana = entries
            .iter()
            .enumerate()
            .map(|(i, k)| (k.kana.clone(), i))
            .collect();
        let max_kana_len = entries.iter().map(KeyConfig::kana_len).max().unwrap_or(0);
        Self {
            entries,
            by_kana,
            max_kana_len,
        }
    }

    pub fn lookup_by_kana(&self, kana: &str) -> Option<&KeyConfig> {
        self.by_kana.get(kana).map(|&i| &self.entries[i])
    }

    /// All entries whose kana is a prefix of `text[pos..]`, restricted to the
    /// longest matching length. Empty when nothing matches.
    pub fn longest_matches_at(&self, text: &[char], pos: usize) -> Vec<&KeyConfig> {
        let remaining = text.len().saturating_sub(pos);
        let mut token = String::new();
        for len in (1..=self.max_kana_len.min(remaining)).rev() {
            token.clear();
            token.extend(&text[pos..pos + len]);
            // Kana are unique, so a length yields at most one entry.
            if let Some(&i) = self.by_kana.get(&token) {
                return vec![&self.entries[i]];
            }
        }
        Vec::new()
    }

    /// Longest kana token length in chars.
    pub fn max_kana_len(&self) -> usize {
        self.max_kana_len
    }

    pub fn entries(&self) -> &[KeyConfig] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
