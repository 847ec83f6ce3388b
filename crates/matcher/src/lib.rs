//! # simscreen matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` takes normalized submissions and scores every unordered pair of
//! them with [`similarity::CompressionSimilarity`]. It owns the size
//! threshold, the parallel pairwise schedule and the shape of the final
//! report; it never touches the filesystem.
//!
//! ## Core Types
//!
//! - [`Submission`]: name, author label and normalized code.
//! - [`SubmissionItem`]: a submission plus its cached compressed payload and
//!   the highest similarity observed for it.
//! - [`MatchConfig`]: size threshold, worker count and chunk size.
//! - [`PairwiseScheduler`]: fixed rayon pool; workers claim chunks of the
//!   linearized pair space with an atomic counter.
//! - [`Screener`]: the full screening pass, producing a [`ScreeningReport`].
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{MatchConfig, NoProgress, Screener, Submission};
//! use similarity::CompressionSimilarity;
//!
//! let body = "int add(int a,int b){return a+b;}\n".repeat(10);
//! let submissions = vec![
//!     Submission::new("alice", body.clone()),
//!     Submission::new("bob", body.replace("add", "sum")),
//!     Submission::new("carol", "int x;\n"),
//! ];
//!
//! let screener = Screener::new(MatchConfig::default(), CompressionSimilarity::default()).unwrap();
//! let report = screener.screen(submissions, &NoProgress).unwrap();
//!
//! assert_eq!(report.pairs.len(), 1);
//! assert_eq!(report.skipped[0].name, "carol");
//! ```
//!
//! ## Concurrency
//!
//! Compression of individual submissions uses rayon data parallelism. The
//! pairwise phase runs on its own pool sized by
//! [`MatchConfig::effective_workers`]. Per-submission aggregation happens
//! after the pool has joined, in a single thread.

pub mod engine;
pub mod pairs;
pub mod progress;
pub mod scheduler;
pub mod types;

pub use crate::engine::Screener;
pub use crate::pairs::{highest_similarities, pair_at, pair_count, PairCursor};
pub use crate::progress::{NoProgress, ProgressObserver};
pub use crate::scheduler::PairwiseScheduler;
pub use crate::types::{
    MatchConfig, MatchError, PairRecord, ScreeningReport, Submission, SubmissionItem,
    SubmissionSummary, DEFAULT_CHUNK_SIZE, DEFAULT_MIN_SIZE_BYTES,
};
