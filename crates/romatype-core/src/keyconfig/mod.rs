//! Kana → romaji spelling table.
//!
//! Loaded from an embedded TOML file (or a custom one installed before first
//! use) into a process-wide singleton with a by-kana index and longest-match
//! lookup.

mod config;
mod table;

pub use config::{parse_keyconfig_toml, KeyConfig, KeyConfigError};
pub use table::{default_toml, KeyConfigTable, DEFAULT_TOML};
