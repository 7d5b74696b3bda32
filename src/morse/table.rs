//! Character to Morse code mapping
//!
//! Codes are written in `.`/`-` notation and stored as a fixed table. The space
//! character is part of the table as a word boundary marker.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Single Morse mark
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    Dot,
    Dash,
}

impl Symbol {
    /// Character used for this mark in textual notation
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Dot => '.',
            Self::Dash => '-',
        }
    }
}

/// Morse code of one input character
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharacterCode {
    /// Word boundary (the space character), never sounded
    WordBoundary,
    /// Sequence of dots and dashes
    Marks(&'static str),
}

impl CharacterCode {
    /// Symbols of this code, empty for a word boundary
    pub fn symbols(self) -> impl Iterator<Item = Symbol> {
        let pattern = match self {
            Self::WordBoundary => "",
            Self::Marks(p) => p,
        };
        pattern.bytes().map(|b| {
            if b == b'.' {
                Symbol::Dot
            } else {
                Symbol::Dash
            }
        })
    }

    /// Textual `.`/`-` pattern, `None` for a word boundary
    #[must_use]
    pub const fn pattern(self) -> Option<&'static str> {
        match self {
            Self::WordBoundary => None,
            Self::Marks(p) => Some(p),
        }
    }
}

const TABLE: &[(char, &str)] = &[
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('0', "-----"),
    (',', "--..--"),
    ('.', ".-.-.-"),
    ('?', "..--.."),
    ('/', "-..-."),
    ('-', "-....-"),
    ('(', "-.--."),
    (')', "-.--.-"),
    ('\'', ".----."),
    ('!', "-.-.--"),
    ('&', ".-..."),
    (':', "---..."),
    (';', "-.-.-."),
    ('=', "-...-"),
    ('+', ".-.-."),
    ('_', "..--.-"),
    ('"', ".-..-."),
    ('$', "...-..-"),
    ('@', ".--.-."),
];

static BY_CHAR: LazyLock<HashMap<char, &'static str>> =
    LazyLock::new(|| TABLE.iter().copied().collect());

static BY_PATTERN: LazyLock<HashMap<&'static str, char>> =
    LazyLock::new(|| TABLE.iter().map(|&(c, p)| (p, c)).collect());

/// Look up the code for a character (case-insensitive)
#[must_use]
pub fn lookup(c: char) -> Option<CharacterCode> {
    if c == ' ' {
        return Some(CharacterCode::WordBoundary);
    }
    // Table letters are all ASCII
    BY_CHAR
        .get(&c.to_ascii_uppercase())
        .map(|&p| CharacterCode::Marks(p))
}

/// Reverse lookup of a `.`/`-` pattern
#[must_use]
pub fn decode(pattern: &str) -> Option<char> {
    BY_PATTERN.get(pattern).copied()
}

/// Every sounded character in the table, in table order
pub fn characters() -> impl Iterator<Item = char> {
    TABLE.iter().map(|&(c, _)| c)
}

/// Render text as `.`/`-` notation
///
/// Characters are separated by a single space and words by ` / `.
/// Unsupported characters are dropped.
#[must_use]
pub fn encode_text(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            word.chars()
                .filter_map(lookup)
                .filter_map(CharacterCode::pattern)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Decode `.`/`-` notation produced by [`encode_text`]
#[must_use]
pub fn decode_text(morse: &str) -> String {
    morse
        .split('/')
        .map(|word| {
            word.split_whitespace()
                .filter_map(|pattern| {
                    let decoded = decode(pattern);
                    if decoded.is_none() {
                        tracing::warn!(pattern, "unknown morse pattern, skipping");
                    }
                    decoded
                })
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
