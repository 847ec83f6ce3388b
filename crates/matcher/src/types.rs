use serde::{Deserialize, Serialize};
use similarity::SimilarityError;
use thiserror::Error;

/// Submissions whose normalized code is shorter than this are skipped.
pub const DEFAULT_MIN_SIZE_BYTES: usize = 250;

/// Consecutive pair indices claimed by a worker at a time.
pub const DEFAULT_CHUNK_SIZE: usize = 4;

/// One submission as handed to the screener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub name: String,
    /// Author label; defaults to the submission name.
    pub author: String,
    /// Normalized text of all source files, each followed by `\n`.
    pub code: String,
}

impl Submission {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            author: name.clone(),
            name,
            code: code.into(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }
}

/// A submission plus the data derived from it during screening.
///
/// The compressed payload is attached once, before the pairwise phase. The
/// highest similarity only ever grows and is updated after the barrier.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionItem {
    submission: Submission,
    compressed: Option<Vec<u8>>,
    highest_similarity: f64,
}

impl SubmissionItem {
    pub fn new(submission: Submission) -> Self {
        Self {
            submission,
            compressed: None,
            highest_similarity: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.submission.name
    }

    pub fn author(&self) -> &str {
        &self.submission.author
    }

    pub fn code(&self) -> &str {
        &self.submission.code
    }

    /// UTF-8 bytes of the code.
    pub fn data(&self) -> &[u8] {
        self.submission.code.as_bytes()
    }

    pub fn attach_compressed(&mut self, compressed: Vec<u8>) {
        self.compressed = Some(compressed);
    }

    pub fn compressed(&self) -> Option<&[u8]> {
        self.compressed.as_deref()
    }

    pub fn uncompressed_size(&self) -> usize {
        self.submission.code.len()
    }

    pub fn compressed_size(&self) -> usize {
        self.compressed.as_ref().map_or(0, Vec::len)
    }

    /// Uncompressed over compressed size; `None` until a non-empty payload
    /// is attached.
    pub fn compression_ratio(&self) -> Option<f64> {
        match self.compressed_size() {
            0 => None,
            compressed => Some(self.uncompressed_size() as f64 / compressed as f64),
        }
    }

    pub fn highest_similarity(&self) -> f64 {
        self.highest_similarity
    }

    /// Raises the highest similarity if `score` beats it.
    pub fn observe_similarity(&mut self, score: f64) {
        if score > self.highest_similarity {
            self.highest_similarity = score;
        }
    }
}

/// Similarity of one unordered pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRecord {
    pub first: String,
    pub second: String,
    pub similarity: f64,
}

impl PairRecord {
    pub fn new(first: impl Into<String>, second: impl Into<String>, similarity: f64) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
            similarity,
        }
    }

    pub fn involves(&self, name: &str) -> bool {
        self.first == name || self.second == name
    }
}

/// Per-submission line of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionSummary {
    pub name: String,
    pub author: String,
    /// `None` for submissions that were never compared.
    pub highest_similarity: Option<f64>,
    pub compression_ratio: Option<f64>,
    pub uncompressed_size: usize,
    pub compressed_size: usize,
}

impl SubmissionSummary {
    pub(crate) fn accepted(item: &SubmissionItem) -> Self {
        Self {
            highest_similarity: Some(item.highest_similarity()),
            ..Self::skipped(item)
        }
    }

    pub(crate) fn skipped(item: &SubmissionItem) -> Self {
        Self {
            name: item.name().to_string(),
            author: item.author().to_string(),
            highest_similarity: None,
            compression_ratio: item.compression_ratio(),
            uncompressed_size: item.uncompressed_size(),
            compressed_size: item.compressed_size(),
        }
    }
}

/// Result of screening one submission set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreeningReport {
    /// Compared submissions, by compression ratio descending.
    pub accepted: Vec<SubmissionSummary>,
    /// Submissions under the size threshold, in input order.
    pub skipped: Vec<SubmissionSummary>,
    /// Every pair of accepted submissions, by similarity descending.
    pub pairs: Vec<PairRecord>,
}

impl ScreeningReport {
    pub fn total(&self) -> usize {
        self.accepted.len() + self.skipped.len()
    }

    pub fn top_pairs(&self, n: usize) -> &[PairRecord] {
        &self.pairs[..n.min(self.pairs.len())]
    }

    pub fn top_items(&self, n: usize) -> &[SubmissionSummary] {
        &self.accepted[..n.min(self.accepted.len())]
    }
}

/// Screening configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Minimum normalized size (bytes) for a submission to be compared.
    #[serde(default = "MatchConfig::default_min_size_bytes")]
    pub min_size_bytes: usize,
    /// Worker threads for the pairwise phase; `None` uses available
    /// parallelism.
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default = "MatchConfig::default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_size_bytes: Self::default_min_size_bytes(),
            workers: None,
            chunk_size: Self::default_chunk_size(),
        }
    }
}

impl MatchConfig {
    pub(crate) fn default_min_size_bytes() -> usize {
        DEFAULT_MIN_SIZE_BYTES
    }

    pub(crate) fn default_chunk_size() -> usize {
        DEFAULT_CHUNK_SIZE
    }

    pub fn with_min_size_bytes(mut self, min_size_bytes: usize) -> Self {
        self.min_size_bytes = min_size_bytes;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.chunk_size == 0 {
            return Err(MatchError::InvalidConfig(
                "chunk_size must be greater than zero".into(),
            ));
        }
        if self.workers == Some(0) {
            return Err(MatchError::InvalidConfig(
                "workers must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
    #[error("duplicate submission name `{0}`")]
    DuplicateName(String),
    #[error("worker pool error: {0}")]
    WorkerPool(String),
    #[error(transparent)]
    Similarity(#[from] SimilarityError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_author_defaults_to_name() {
        let s = Submission::new("alice", "int x;");
        assert_eq!(s.author, "alice");
        assert_eq!(s.with_author("Alice A.").author, "Alice A.");
    }

    #[test]
    fn item_sizes_and_ratio() {
        let mut item = SubmissionItem::new(Submission::new("a", "x".repeat(300)));
        assert_eq!(item.uncompressed_size(), 300);
        assert_eq!(item.data(), "x".repeat(300).as_bytes());
        assert_eq!(item.compressed_size(), 0);
        assert_eq!(item.compressed(), None);
        assert_eq!(item.compression_ratio(), None);
        item.attach_compressed(vec![7; 30]);
        assert_eq!(item.compressed(), Some(&[7u8; 30][..]));
        assert_eq!(item.compressed_size(), 30);
        assert_eq!(item.compression_ratio(), Some(10.0));
    }

    #[test]
    fn highest_similarity_is_monotonic() {
        let mut item = SubmissionItem::new(Submission::new("a", ""));
        assert_eq!(item.highest_similarity(), 0.0);
        item.observe_similarity(0.4);
        item.observe_similarity(0.2);
        assert_eq!(item.highest_similarity(), 0.4);
        item.observe_similarity(0.9);
        assert_eq!(item.highest_similarity(), 0.9);
    }

    #[test]
    fn summaries_mark_skipped() {
        let item = SubmissionItem::new(Submission::new("tiny", "x"));
        assert_eq!(SubmissionSummary::skipped(&item).highest_similarity, None);
        assert_eq!(SubmissionSummary::accepted(&item).highest_similarity, Some(0.0));
    }

    #[test]
    fn config_defaults_and_validation() {
        let cfg = MatchConfig::default();
        assert_eq!(cfg.min_size_bytes, 250);
        assert_eq!(cfg.chunk_size, 4);
        assert!(cfg.effective_workers() >= 1);
        assert!(cfg.validate().is_ok());
        assert!(MatchConfig::default().with_chunk_size(0).validate().is_err());
        assert!(MatchConfig::default().with_workers(0).validate().is_err());
        assert_eq!(MatchConfig::default().with_workers(3).effective_workers(), 3);
    }

    #[test]
    fn config_partial_json_uses_defaults() {
        let cfg: MatchConfig = serde_json::from_str(r#"{"min_size_bytes": 50}"#).unwrap();
        assert_eq!(cfg, MatchConfig::default().with_min_size_bytes(50));
    }

    #[test]
    fn report_top_slices_clamp() {
        let report = ScreeningReport {
            pairs: vec![PairRecord::new("a", "b", 0.5)],
            ..Default::default()
        };
        assert_eq!(report.top_pairs(20).len(), 1);
        assert!(report.top_items(5).is_empty());
        assert!(report.pairs[0].involves("b"));
        assert!(!report.pairs[0].involves("c"));
    }
}
