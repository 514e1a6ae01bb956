pub mod config_ops;
pub mod typing_ops;

use std::fs;
use std::io;

use romatype_core::keyconfig::KeyConfigError;
use romatype_core::settings::SettingsError;
use romatype_core::{ConversionTendency, KeyConfigTable, TendencyError};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("keyconfig: {0}")]
    KeyConfig(#[from] KeyConfigError),
    #[error("tendency: {0}")]
    Tendency(#[from] TendencyError),
    #[error("settings: {0}")]
    Settings(#[from] SettingsError),
}

pub(crate) fn read_file(path: &str) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_string(),
        source,
    })
}

/// Install a custom keyconfig table. Must run before any typing command.
pub fn install_keyconfig(path: &str) -> Result<(), LoadError> {
    KeyConfigTable::init_custom(read_file(path)?)?;
    info!(path, entries = KeyConfigTable::global().len(), "custom keyconfig installed");
    Ok(())
}

/// Install custom search settings. Must run before any typing command.
pub fn install_settings(path: &str) -> Result<(), LoadError> {
    romatype_core::settings::init_custom(read_file(path)?)?;
    info!(path, "custom settings installed");
    Ok(())
}

/// Tendency for a typing command: a file checked against the active table,
/// the baseline, or no preferences at all.
pub fn load_tendency(path: Option<&str>, baseline: bool) -> Result<ConversionTendency, LoadError> {
    let tendency = match path {
        Some(path) => {
            let t = romatype_core::parse_tendency_toml(&read_file(path)?)?;
            t.validate_against(KeyConfigTable::global())?;
            t
        }
        None if baseline => ConversionTendency::baseline(),
        None => ConversionTendency::new(),
    };
    info!(preferences = tendency.len(), "tendency loaded");
    Ok(tendency)
}
