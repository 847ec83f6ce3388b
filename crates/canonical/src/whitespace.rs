//! Whitespace run handling for [`WhitespacePolicy::Collapse`].
//!
//! A run survives as a single ASCII space only when it separates two
//! identifier characters, which keeps `int  x` apart as `int x` while
//! `x  =  1` becomes `x=1`. The flanking characters are looked up in the
//! input, not in the output.
//!
//! [`WhitespacePolicy::Collapse`]: crate::WhitespacePolicy::Collapse

use crate::codepoints::{is_identifier_char, is_whitespace};

/// End (exclusive) of the whitespace run starting at `start`.
pub(crate) fn run_end(cps: &[char], start: usize) -> usize {
    let mut end = start;
    while end < cps.len() && is_whitespace(cps[end]) {
        end += 1;
    }
    end
}

/// Whether the run `[start, end)` must be replaced by a single space.
pub(crate) fn run_separates_identifiers(cps: &[char], start: usize, end: usize) -> bool {
    start > 0
        && end < cps.len()
        && is_identifier_char(cps[start - 1])
        && is_identifier_char(cps[end])
}

/// Collapses whitespace over a whole string using the same flanking rule
/// the normalizer applies outside literals and comments.
///
/// Unlike [`normalize`](crate::normalize) this knows nothing about strings or
/// comments, which makes it suitable for text that is already normalized.
///
/// ```rust
/// use canonical::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("int   x  =  1 ;"), "int x=1;");
/// assert_eq!(collapse_whitespace("  a\n\tb  "), "a b");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    let cps: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < cps.len() {
        if is_whitespace(cps[i]) {
            let end = run_end(&cps, i);
            if run_separates_identifiers(&cps, i, end) {
                out.push(' ');
            }
            i = end;
        } else {
            out.push(cps[i]);
            i += 1;
        }
    }
    out
}
