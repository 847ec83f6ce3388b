//! # simscreen similarity metrics
//!
//! Scores pairs of normalized source texts in `[0, 1]`.
//!
//! ## Contract
//!
//! - Inputs are already-normalized strings; this crate never reads files
//!   or applies normalization itself.
//! - Every metric is symmetric and deterministic for a fixed configuration.
//! - A metric holds no mutable state and is `Send + Sync`, so one instance
//!   is shared by every worker during a screening run.
//!
//! ## Metrics
//!
//! 1.  **[`CompressionSimilarity`]**: a normalized-compression-distance
//!     heuristic over an opaque [`Compressor`] (zstd by default, deflate
//!     optionally). Individual compressed sizes can be cached by the caller
//!     and passed to [`CompressionSimilarity::similarity_with_sizes`], so a
//!     full pairwise run only compresses each concatenation.
//!
//! 2.  **[`EditDistance`]**: Levenshtein distance turned into a similarity,
//!     `1 - d / max(|a|, |b|)`. Quadratic; meant for short texts.
//!
//! ## Example Usage
//!
//! ```
//! use similarity::{CompressionSimilarity, CompressorKind, EditDistance, SimilarityConfig};
//!
//! let cfg = SimilarityConfig::new().with_compressor(CompressorKind::Deflate);
//! let engine = CompressionSimilarity::from_config(&cfg).unwrap();
//!
//! let a = "int main(){int total=0;for(int i=0;i<10;++i)total+=i;return total;}";
//! let score = engine.similarity(a, a).unwrap();
//! assert!(score > 0.5 && score <= 1.0);
//!
//! assert_eq!(EditDistance.similarity("abc", "abc"), 1.0);
//! ```
pub mod compressor;
pub mod config;
mod edit_distance;
mod ncd;

pub use crate::compressor::{Compressor, DeflateCompressor, ZstdCompressor};
pub use crate::config::{CompressorKind, SimilarityConfig, SimilarityError};
pub use crate::edit_distance::{levenshtein, EditDistance};
pub use crate::ncd::{inverse_lerp, CompressionSimilarity};

/// A symmetric pairwise similarity in `[0, 1]`.
pub trait SimilarityMetric: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> Result<f64, SimilarityError>;
}
