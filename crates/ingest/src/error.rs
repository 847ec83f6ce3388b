//! Error types produced by the ingest crate.
//!
//! Two tiers:
//!
//! | Error | Recovery |
//! |-------|----------|
//! | [`IngestError`] | Fatal for the run; propagated to the caller |
//! | [`DecodeError`] | Recovered per file: logged and the file is read as empty |
//!
//! `IngestError` carries paths and messages rather than `std::io::Error`
//! so it stays `Clone + PartialEq` for tests.
//!
//! ```rust
//! use ingest::IngestError;
//! use std::path::PathBuf;
//!
//! let err = IngestError::NotADirectory(PathBuf::from("/tmp/missing"));
//! assert_eq!(err.to_string(), "not a directory: /tmp/missing");
//! ```
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that abort loading a submission set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IngestError {
    /// Reading a file or listing a directory failed.
    #[error("i/o error at {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    /// The submission or assignment root is missing or not a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The directory walk itself failed (permissions, vanished entries).
    #[error("directory walk failed at {}: {message}", path.display())]
    Walk { path: PathBuf, message: String },

    #[error("invalid ingest config: {0}")]
    InvalidConfig(String),
}

impl IngestError {
    pub(crate) fn io(path: &Path, err: std::io::Error) -> Self {
        IngestError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub(crate) fn walk(root: &Path, err: walkdir::Error) -> Self {
        let path = err.path().unwrap_or(root).to_path_buf();
        IngestError::Walk {
            path,
            message: err.to_string(),
        }
    }
}

/// Why a file's bytes could not be turned into text.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid UTF-8 after byte {valid_up_to}")]
    InvalidUtf8 { valid_up_to: usize },

    #[error("UTF-16 payload has odd length {len}")]
    OddUtf16Length { len: usize },

    #[error("unpaired UTF-16 surrogate at code unit {index}")]
    UnpairedSurrogate { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_path() {
        let err = IngestError::Io {
            path: PathBuf::from("a/b.cpp"),
            message: "denied".into(),
        };
        assert_eq!(err.to_string(), "i/o error at a/b.cpp: denied");
    }

    #[test]
    fn io_helper_keeps_message() {
        let err = IngestError::io(
            Path::new("x.c"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(
            err,
            IngestError::Io {
                path: PathBuf::from("x.c"),
                message: "gone".into()
            }
        );
    }

    #[test]
    fn decode_error_display() {
        assert_eq!(
            DecodeError::InvalidUtf8 { valid_up_to: 3 }.to_string(),
            "invalid UTF-8 after byte 3"
        );
    }
}
