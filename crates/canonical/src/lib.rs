//! Lexical source normalizer.
//!
//! This crate reduces source text to a form that is robust to cosmetic
//! rewrites so that two submissions differing only in formatting, comments,
//! string contents or identifier names compress alike downstream.
//!
//! ## What we do
//!
//! - Unicode canonical composition (NFC) and line-ending unification
//! - Whitespace collapsing that still keeps adjacent identifiers apart
//! - String and character literal detection, including `R"delim(...)delim"`
//! - Line and block comment detection
//! - Identifier/content obscuring per [`ContentPolicy`]
//!
//! ## What we don't do
//!
//! This is not a parser. There is no grammar, no AST and no validation.
//! Contexts are detected heuristically, and unterminated strings or comments
//! are closed at end of line or end of input instead of being reported.
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock, no locale. The same text and policy produce the same
//! output on every machine.
//!
//! ```rust
//! use canonical::{normalize, CommentPolicy, ContentPolicy, ProcessingPolicy, StringPolicy, WhitespacePolicy};
//!
//! let policy = ProcessingPolicy::new(
//!     WhitespacePolicy::Collapse,
//!     ContentPolicy::Keep,
//!     StringPolicy::DropContent,
//!     CommentPolicy::Remove,
//! );
//! let out = normalize("int x = 1;  // set x\n\"hello\";", &policy);
//! assert_eq!(out, "int x=1;\"\";");
//! ```

mod codepoints;
mod config;
mod error;
mod scanner;
mod whitespace;

pub use crate::codepoints::{is_identifier_char, prepare_codepoints, Composition};
pub use crate::config::{
    CommentPolicy, ContentPolicy, ProcessingPolicy, StringPolicy, WhitespacePolicy,
};
pub use crate::error::PolicyError;
pub use crate::whitespace::collapse_whitespace;

use crate::scanner::Scanner;

/// Normalizes raw source text according to `policy`.
///
/// Total: every input, however malformed, produces an output.
pub fn normalize(raw: &str, policy: &ProcessingPolicy) -> String {
    let cps = prepare_codepoints(raw, Composition::Canonical);
    normalize_codepoints(&cps, policy)
}

/// Runs the scanner over an already prepared codepoint buffer.
pub fn normalize_codepoints(cps: &[char], policy: &ProcessingPolicy) -> String {
    Scanner::new(cps, *policy).run()
}

/// Whitespace-only minification with compatibility composition (NFKC).
///
/// Folds compatibility characters (ligatures, full-width forms) before
/// collapsing whitespace. Unlike a plain whitespace squeeze, strings and
/// comments are still recognized, so whitespace inside them is left
/// untouched and a line comment keeps its terminating newline.
pub fn minify(raw: &str) -> String {
    let cps = prepare_codepoints(raw, Composition::Compatibility);
    normalize_codepoints(&cps, &ProcessingPolicy::minify())
}
