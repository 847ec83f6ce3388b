//! Compression-based similarity between two normalized texts.
//!
//! For texts `a` and `b` with compressed sizes `ca` and `cb`:
//!
//! ```text
//! avg  = (C(a ++ b) + C(b ++ a)) / 2
//! mult = sqrt(min(ca, cb) / max(ca, cb))
//! raw  = mult * inverse_lerp(ca + cb, max(ca, cb), avg)
//! ```
//!
//! Compressing both concatenation orders makes the score symmetric. The
//! inverse lerp maps "no shared information" (`avg == ca + cb`) to 0 and
//! "one text explains the other" (`avg == max`) to 1; `mult` penalizes pairs
//! whose sizes differ a lot. Compressor framing overhead can push `raw`
//! slightly outside `[0, 1]`, so the public score is clamped.

use tracing::debug;

use crate::compressor::{Compressor, ZstdCompressor};
use crate::config::{SimilarityConfig, SimilarityError};
use crate::SimilarityMetric;

/// Stand-in for empty text; compressors handle zero bytes inconsistently.
const EMPTY_SUBSTITUTE: &str = " ";

fn or_substitute(text: &str) -> &str {
    if text.is_empty() {
        EMPTY_SUBSTITUTE
    } else {
        text
    }
}

/// `(s - x) / (y - x)`: where `s` sits between `x` (0) and `y` (1).
pub fn inverse_lerp(x: f64, y: f64, s: f64) -> f64 {
    (s - x) / (y - x)
}

/// Similarity engine over an opaque compressor.
pub struct CompressionSimilarity {
    compressor: Box<dyn Compressor>,
}

impl std::fmt::Debug for CompressionSimilarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompressionSimilarity")
            .field("compressor", &self.compressor.name())
            .finish()
    }
}

impl Default for CompressionSimilarity {
    fn default() -> Self {
        Self::new(ZstdCompressor::default())
    }
}

impl CompressionSimilarity {
    pub fn new<C: Compressor + 'static>(compressor: C) -> Self {
        Self {
            compressor: Box::new(compressor),
        }
    }

    pub fn from_boxed(compressor: Box<dyn Compressor>) -> Self {
        Self { compressor }
    }

    pub fn from_config(cfg: &SimilarityConfig) -> Result<Self, SimilarityError> {
        Ok(Self::from_boxed(cfg.build_compressor()?))
    }

    pub fn compressor(&self) -> &dyn Compressor {
        self.compressor.as_ref()
    }

    /// Compressed UTF-8 bytes of `text` (empty text is compressed as `" "`).
    pub fn compress_text(&self, text: &str) -> Result<Vec<u8>, SimilarityError> {
        self.compressor.compress(or_substitute(text).as_bytes())
    }

    fn concat_len(&self, first: &str, second: &str) -> Result<usize, SimilarityError> {
        let mut joined = Vec::with_capacity(first.len() + second.len());
        joined.extend_from_slice(first.as_bytes());
        joined.extend_from_slice(second.as_bytes());
        self.compressor.compressed_len(&joined)
    }

    /// Scores `a` against `b`, compressing each side individually.
    pub fn similarity(&self, a: &str, b: &str) -> Result<f64, SimilarityError> {
        let size_a = self.compress_text(a)?.len();
        let size_b = self.compress_text(b)?.len();
        self.similarity_with_sizes(a, b, size_a, size_b)
    }

    /// Scores `a` against `b` using precomputed compressed sizes, so only the
    /// two concatenations are compressed. The result is clamped to `[0, 1]`.
    pub fn similarity_with_sizes(
        &self,
        a: &str,
        b: &str,
        size_a: usize,
        size_b: usize,
    ) -> Result<f64, SimilarityError> {
        let raw = self.raw_similarity_with_sizes(a, b, size_a, size_b)?;
        if !(0.0..=1.0).contains(&raw) {
            debug!(raw, size_a, size_b, "similarity_out_of_range");
            return Ok(raw.clamp(0.0, 1.0));
        }
        Ok(raw)
    }

    /// Same as [`similarity_with_sizes`](Self::similarity_with_sizes) without
    /// clamping.
    pub fn raw_similarity_with_sizes(
        &self,
        a: &str,
        b: &str,
        size_a: usize,
        size_b: usize,
    ) -> Result<f64, SimilarityError> {
        let min = size_a.min(size_b);
        let max = size_a.max(size_b);
        if min == 0 {
            return Ok(0.0);
        }

        let a = or_substitute(a);
        let b = or_substitute(b);
        let ab = self.concat_len(a, b)?;
        let ba = self.concat_len(b, a)?;
        let avg = (ab + ba) as f64 / 2.0;

        let mult = (min as f64 / max as f64).sqrt();
        let joint = (size_a + size_b) as f64;
        Ok(mult * inverse_lerp(joint, max as f64, avg))
    }
}

impl SimilarityMetric for CompressionSimilarity {
    fn similarity(&self, a: &str, b: &str) -> Result<f64, SimilarityError> {
        CompressionSimilarity::similarity(self, a, b)
    }
}
