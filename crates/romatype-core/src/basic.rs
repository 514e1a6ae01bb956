//! Context-free romanization with canonical spellings.
//!
//! Used only when the best-continuation search has no candidate: ん is always
//! a bare `n`, everything else takes its table default, unknown chars pass
//! through.

use crate::keyconfig::KeyConfigTable;

pub fn basic_romaji(reading: &str) -> String {
    basic_romaji_with(KeyConfigTable::global(), reading)
}

pub fn basic_romaji_with(table: &KeyConfigTable, reading: &str) -> String {
    let text: Vec<char> = reading.chars().collect();
    let mut out = String::with_capacity(reading.len());
    let mut pos = 0;
    while pos < text.len() {
        if text[pos] == 'ん' {
            out.push('n');
            pos += 1;
            continue;
        }
        match table.longest_matches_at(&text, pos).first() {
            Some(k) => {
                out.push_str(k.canonical());
                pos += k.kana_len();
            }
            None => {
                out.push(text[pos]);
                pos += 1;
            }
        }
    }
    out
}
