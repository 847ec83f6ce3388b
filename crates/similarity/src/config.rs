//! Configuration and error types for the similarity metrics.
//!
//! The configuration only selects and tunes the compressor backing
//! [`CompressionSimilarity`](crate::CompressionSimilarity). It carries no
//! I/O or environment-dependent state, so two engines built from equal
//! configs score every pair identically.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compressor::{Compressor, DeflateCompressor, ZstdCompressor};

/// Compressor backend used to approximate information content.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CompressorKind {
    /// Zstandard; large window, good at long-range repeats.
    #[default]
    Zstd,
    /// Raw deflate; 32 KiB window, only suitable for small submissions.
    Deflate,
}

impl CompressorKind {
    pub const fn default_level(self) -> i32 {
        match self {
            CompressorKind::Zstd => ZstdCompressor::DEFAULT_LEVEL,
            CompressorKind::Deflate => DeflateCompressor::DEFAULT_LEVEL as i32,
        }
    }

    pub const fn level_range(self) -> (i32, i32) {
        match self {
            CompressorKind::Zstd => (1, 22),
            CompressorKind::Deflate => (0, 9),
        }
    }
}

impl std::str::FromStr for CompressorKind {
    type Err = SimilarityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zstd" | "zstandard" => Ok(CompressorKind::Zstd),
            "deflate" | "flate" => Ok(CompressorKind::Deflate),
            other => Err(SimilarityError::InvalidConfig(format!(
                "unknown compressor `{other}` (expected zstd or deflate)"
            ))),
        }
    }
}

/// Similarity engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SimilarityConfig {
    pub compressor: CompressorKind,
    /// Compression level; `None` picks the backend default.
    pub level: Option<i32>,
}

impl SimilarityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compressor(mut self, compressor: CompressorKind) -> Self {
        self.compressor = compressor;
        self
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = Some(level);
        self
    }

    /// Level that will actually be used.
    pub fn effective_level(&self) -> i32 {
        self.level
            .unwrap_or_else(|| self.compressor.default_level())
    }

    pub fn validate(&self) -> Result<(), SimilarityError> {
        let level = self.effective_level();
        let (lo, hi) = self.compressor.level_range();
        if level < lo || level > hi {
            return Err(SimilarityError::InvalidConfig(format!(
                "{:?} level must be within {lo}..={hi} (got {level})",
                self.compressor
            )));
        }
        Ok(())
    }

    /// Validates and instantiates the configured backend.
    pub fn build_compressor(&self) -> Result<Box<dyn Compressor>, SimilarityError> {
        self.validate()?;
        let level = self.effective_level();
        Ok(match self.compressor {
            CompressorKind::Zstd => Box::new(ZstdCompressor::new(level)),
            CompressorKind::Deflate => Box::new(DeflateCompressor::new(level as u32)),
        })
    }
}

/// Errors returned by the similarity metrics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimilarityError {
    #[error("compression failed ({backend}): {message}")]
    Compression {
        backend: &'static str,
        message: String,
    },

    #[error("invalid similarity config: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = SimilarityConfig::default();
        assert_eq!(cfg.compressor, CompressorKind::Zstd);
        assert_eq!(cfg.level, None);
        assert_eq!(cfg.effective_level(), ZstdCompressor::DEFAULT_LEVEL);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn builder_chain() {
        let cfg = SimilarityConfig::new()
            .with_compressor(CompressorKind::Deflate)
            .with_level(6);
        assert_eq!(cfg.compressor, CompressorKind::Deflate);
        assert_eq!(cfg.effective_level(), 6);
        let compressor = cfg.build_compressor().unwrap();
        assert_eq!(compressor.name(), "deflate");
    }

    #[test]
    fn level_out_of_range_rejected() {
        let cfg = SimilarityConfig::new().with_level(23);
        assert!(matches!(
            cfg.validate(),
            Err(SimilarityError::InvalidConfig(_))
        ));
        let cfg = SimilarityConfig::new()
            .with_compressor(CompressorKind::Deflate)
            .with_level(10);
        assert!(cfg.build_compressor().is_err());
    }

    #[test]
    fn kind_parses() {
        assert_eq!("ZSTD".parse::<CompressorKind>(), Ok(CompressorKind::Zstd));
        assert_eq!(" deflate".parse::<CompressorKind>(), Ok(CompressorKind::Deflate));
        assert!("lzma".parse::<CompressorKind>().is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = SimilarityConfig::new()
            .with_compressor(CompressorKind::Deflate)
            .with_level(9);
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"deflate\""));
        let back: SimilarityConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);

        let partial: SimilarityConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(partial, SimilarityConfig::default());
    }

    #[test]
    fn error_display() {
        let err = SimilarityError::Compression {
            backend: "zstd",
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "compression failed (zstd): boom");
    }
}
