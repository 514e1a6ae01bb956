
use crate::keyconfig::KeyConfigTable;
use crate::predict::{input_status_with, predict_next_with, InputStatus};

/// Type `spelling` one char at a time against `reading`, checking that each
/// char was offered while the line was still in progress. Returns the final
/// status.
pub(super) fn type_through(table: &KeyConfigTable, reading: &str, spelling: &str) -> InputStatus {
    let mut typed = String::new();
    for ch in spelling.chars() {
        let status = input_status_with(table, reading, &typed);
        assert_ne!(
            status,
            InputStatus::Diverged,
            "{typed:?} diverged while typing {spelling:?} for {reading:?}"
        );
        if status == InputStatus::InProgress {
            let preds = predict_next_with(table, reading, &typed);
            assert!(
                preds.iter().any(|p| p.letter == ch),
                "{ch:?} not offered after {typed:?} for {reading:?}, got {preds:?}"
            );
        }
        typed.push(ch);
    }
    input_status_with(table, reading, &typed)
}
