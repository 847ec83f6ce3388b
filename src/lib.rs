//! Workspace umbrella crate for simscreen.
//!
//! This crate stitches together submission loading, normalization and
//! pairwise compression similarity so callers can screen an assignment
//! directory with a single API entry point ([`run_screening`]), or screen
//! in-memory submissions with [`screen_submissions`].

pub mod config;
pub mod report;

pub use canonical::{
    CommentPolicy, ContentPolicy, PolicyError, ProcessingPolicy, StringPolicy, WhitespacePolicy,
    collapse_whitespace, minify, normalize,
};
pub use ingest::{
    DecodeError, ExtensionFilter, IngestConfig, IngestError, LoadedSubmission, decode_source,
    discover_source_files, load_assignment, load_submission,
};
pub use matcher::{
    MatchConfig, MatchError, NoProgress, PairRecord, PairwiseScheduler, ProgressObserver,
    ScreeningReport, Screener, Submission, SubmissionItem, SubmissionSummary,
};
pub use similarity::{
    CompressionSimilarity, Compressor, CompressorKind, DeflateCompressor, EditDistance,
    SimilarityConfig, SimilarityError, SimilarityMetric, ZstdCompressor,
};

pub use crate::config::{ConfigLoadError, SimscreenConfig};
pub use crate::report::{ReportError, Summary};

use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, warn};

/// Errors that can occur while screening an assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    Ingest(IngestError),
    Similarity(SimilarityError),
    Match(MatchError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Ingest(err) => write!(f, "ingest failure: {err}"),
            PipelineError::Similarity(err) => write!(f, "similarity setup failed: {err}"),
            PipelineError::Match(err) => write!(f, "screening failed: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Ingest(err) => Some(err),
            PipelineError::Similarity(err) => Some(err),
            PipelineError::Match(err) => Some(err),
        }
    }
}

impl From<IngestError> for PipelineError {
    fn from(value: IngestError) -> Self {
        PipelineError::Ingest(value)
    }
}

impl From<SimilarityError> for PipelineError {
    fn from(value: SimilarityError) -> Self {
        PipelineError::Similarity(value)
    }
}

impl From<MatchError> for PipelineError {
    fn from(value: MatchError) -> Self {
        PipelineError::Match(value)
    }
}

/// Outcome of screening one assignment directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningRun {
    /// Final component of the assignment directory.
    pub assignment: String,
    pub report: ScreeningReport,
    /// Files that were read as empty because they could not be decoded.
    pub undecodable: Vec<PathBuf>,
}

/// Screens already-normalized submissions with the similarity and matcher
/// sections of `cfg`.
pub fn screen_submissions(
    submissions: Vec<Submission>,
    cfg: &SimscreenConfig,
    progress: &dyn ProgressObserver,
) -> Result<ScreeningReport, PipelineError> {
    let similarity = CompressionSimilarity::from_config(&cfg.similarity)?;
    let screener = Screener::new(cfg.matcher.clone(), similarity)?;
    Ok(screener.screen(submissions, progress)?)
}

/// Loads every submission under `root`, normalizes it and screens all
/// pairs.
pub fn run_screening(
    root: &Path,
    cfg: &SimscreenConfig,
    progress: &dyn ProgressObserver,
) -> Result<ScreeningRun, PipelineError> {
    let start = Instant::now();
    let assignment = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());

    let loaded = load_assignment(root, &cfg.ingest_config())?;
    let mut undecodable = Vec::new();
    let submissions: Vec<Submission> = loaded
        .into_iter()
        .map(|s| {
            undecodable.extend(s.undecodable);
            Submission::new(s.name, s.code)
        })
        .collect();

    match screen_submissions(submissions, cfg, progress) {
        Ok(report) => {
            info!(
                assignment = %assignment,
                total = report.total(),
                pairs = report.pairs.len(),
                undecodable = undecodable.len(),
                elapsed_micros = start.elapsed().as_micros(),
                "run_success"
            );
            Ok(ScreeningRun {
                assignment,
                report,
                undecodable,
            })
        }
        Err(err) => {
            warn!(
                assignment = %assignment,
                error = %err,
                elapsed_micros = start.elapsed().as_micros(),
                "run_failure"
            );
            Err(err)
        }
    }
}
