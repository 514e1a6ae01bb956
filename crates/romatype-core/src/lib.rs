//! Kana → romaji engine for typing games.
//!
//! Given a kana reading and the romaji typed so far, [`predict_next`] reports
//! which keys may come next and [`best_romanization`] renders the preferred
//! full romanization, honoring a [`ConversionTendency`]. All calls are
//! stateless; the keyconfig table and settings are lazy process-wide
//! singletons.

pub mod basic;
pub mod explain;
pub mod keyconfig;
pub mod predict;
pub mod search;
pub mod settings;
pub mod slot;
pub mod tendency;
pub mod unicode;

#[cfg(test)]
mod tests;

pub use basic::{basic_romaji, basic_romaji_with};
pub use keyconfig::{KeyConfig, KeyConfigError, KeyConfigTable};
pub use predict::{
    input_status, input_status_with, predict_next, predict_next_with, InputStatus, KeyPrediction,
};
pub use search::{best_romanization, best_romanization_with, remaining_romanization, Candidate};
pub use tendency::{parse_tendency_toml, ConversionTendency, TendencyError};
