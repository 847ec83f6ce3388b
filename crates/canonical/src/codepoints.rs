//! Codepoint buffer preparation and character classes.
//!
//! The normalizer never indexes into UTF-8 or UTF-16 storage: it works over a
//! `Vec<char>`, so a cursor always lands on a whole scalar value.

use unicode_normalization::UnicodeNormalization;

/// Unicode composition applied before scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composition {
    /// Canonical composition (NFC).
    Canonical,
    /// Compatibility composition (NFKC).
    Compatibility,
}

/// Composes `raw`, unifies every line terminator to `\n`, and returns the
/// resulting scalar values.
///
/// Recognized terminators: `\r\n`, `\r`, NEL (U+0085), LINE SEPARATOR
/// (U+2028), PARAGRAPH SEPARATOR (U+2029) and FORM FEED (U+000C).
pub fn prepare_codepoints(raw: &str, composition: Composition) -> Vec<char> {
    let composed: Vec<char> = match composition {
        Composition::Canonical => raw.nfc().collect(),
        Composition::Compatibility => raw.nfkc().collect(),
    };

    let mut out = Vec::with_capacity(composed.len());
    let mut iter = composed.into_iter().peekable();
    while let Some(ch) = iter.next() {
        match ch {
            '\r' => {
                if iter.peek() == Some(&'\n') {
                    iter.next();
                }
                out.push('\n');
            }
            '\u{0085}' | '\u{2028}' | '\u{2029}' | '\u{000C}' => out.push('\n'),
            other => out.push(other),
        }
    }
    out
}

/// Letter, digit or underscore.
#[inline]
pub fn is_identifier_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

#[inline]
pub(crate) fn is_whitespace(ch: char) -> bool {
    ch.is_whitespace()
}

/// Digit test used by the digit-separator heuristic; ASCII only.
#[inline]
pub(crate) fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}
