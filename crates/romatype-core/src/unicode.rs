//! Character-level classification for kana text and romaji keystrokes.

pub const SOKUON: &str = "っ";
pub const MORAIC_N: &str = "ん";

/// Check the full Hiragana block (U+3040..U+309F). This includes a few unassigned
/// codepoints (U+3040, U+3097-3098) but these never appear in typing lines,
/// so the simpler block-level check is preferred.
pub fn is_hiragana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c)
}

/// Check the full Katakana block (U+30A0..U+30FF), which also holds ー.
pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

/// Marks inside the kana blocks that are punctuation rather than syllables.
pub fn is_kana_mark(c: char) -> bool {
    matches!(c, 'ー' | '・' | '゛' | '゜' | 'ヽ' | 'ヾ' | 'ゝ' | 'ゞ')
}

/// True when every char of a non-empty token is a hiragana or katakana
/// syllable. ー and ・ count as symbols.
pub fn is_kana_token(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| (is_hiragana(c) || is_katakana(c)) && !is_kana_mark(c))
}

pub fn is_romaji_vowel(c: char) -> bool {
    matches!(c, 'a' | 'i' | 'u' | 'e' | 'o')
}

/// A letter that may be doubled to type っ: an ASCII consonant other than `n`.
pub fn is_doublable(c: char) -> bool {
    c.is_ascii_alphabetic() && !is_romaji_vowel(c.to_ascii_lowercase()) && c != 'n' && c != 'N'
}

/// A letter after which a bare `n` for ん would be read as part of the next
/// syllable (な, にゃ, んん...).
pub fn blocks_bare_n(c: char) -> bool {
    is_romaji_vowel(c) || c == 'y' || c == 'n'
}
