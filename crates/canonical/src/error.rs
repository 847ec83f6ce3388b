use thiserror::Error;

/// Errors raised while building a processing policy from text.
///
/// Normalization itself is total; only policy parsing can fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("unknown {axis} policy `{value}` (expected one of: {expected})")]
    UnknownVariant {
        axis: &'static str,
        value: String,
        expected: &'static str,
    },
}
