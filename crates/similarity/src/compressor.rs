//! Opaque byte compressors.
//!
//! The similarity engine only needs `compress(bytes) -> bytes`. Backends
//! must be deterministic for identical input and must not share state
//! (dictionaries, trained models) across calls.

use std::io::Write;

use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::config::SimilarityError;

/// A general-purpose, deterministic byte compressor.
pub trait Compressor: Send + Sync {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &'static str;

    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, SimilarityError>;

    fn compressed_len(&self, bytes: &[u8]) -> Result<usize, SimilarityError> {
        Ok(self.compress(bytes)?.len())
    }
}

/// Zstandard via `zstd::stream::encode_all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZstdCompressor {
    level: i32,
}

impl ZstdCompressor {
    pub const DEFAULT_LEVEL: i32 = 9;

    pub fn new(level: i32) -> Self {
        Self { level }
    }

    pub fn level(&self) -> i32 {
        self.level
    }
}

impl Default for ZstdCompressor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEVEL)
    }
}

impl Compressor for ZstdCompressor {
    fn name(&self) -> &'static str {
        "zstd"
    }

    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, SimilarityError> {
        zstd::stream::encode_all(bytes, self.level).map_err(|e| SimilarityError::Compression {
            backend: self.name(),
            message: e.to_string(),
        })
    }
}

/// Raw deflate via `flate2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeflateCompressor {
    level: u32,
}

impl DeflateCompressor {
    pub const DEFAULT_LEVEL: u32 = 9;

    pub fn new(level: u32) -> Self {
        Self { level }
    }
}

impl Default for DeflateCompressor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LEVEL)
    }
}

impl Compressor for DeflateCompressor {
    fn name(&self) -> &'static str {
        "deflate"
    }

    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>, SimilarityError> {
        let to_err = |e: std::io::Error| SimilarityError::Compression {
            backend: "deflate",
            message: e.to_string(),
        };
        let mut encoder = DeflateEncoder::new(
            Vec::with_capacity(bytes.len() / 2 + 16),
            Compression::new(self.level),
        );
        encoder.write_all(bytes).map_err(to_err)?;
        encoder.finish().map_err(to_err)
    }
}
