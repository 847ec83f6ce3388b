//! simscreen ingest layer
//!
//! This is where submissions enter the screening pipeline. An assignment
//! directory holds one subdirectory per submission; each submission is every
//! source file below it, decoded, normalized and concatenated.
//!
//! ## What we do here
//!
//! - **Discover files** - breadth-first, files before subdirectories, both
//!   sorted by name, filtered by a case-insensitive [`ExtensionFilter`].
//! - **Decode** - BOM-aware UTF-8 / UTF-16 decoding. A file that cannot be
//!   decoded is logged and treated as empty; it never aborts the run.
//! - **Normalize** - each file goes through [`canonical::normalize`] with the
//!   configured [`ProcessingPolicy`](canonical::ProcessingPolicy) and is
//!   followed by `\n`.
//! - **Log** - structured `tracing` events per submission and per run.
//!
//! I/O failures (unreadable files, vanished directories) are fatal and come
//! back as [`IngestError`].
//!
//! ## Example
//!
//! ```no_run
//! use ingest::{load_assignment, IngestConfig};
//! use std::path::Path;
//!
//! let submissions = load_assignment(Path::new("assignment-3"), &IngestConfig::default())?;
//! for submission in &submissions {
//!     println!("{}: {} files, {} bytes", submission.name, submission.files.len(), submission.code.len());
//! }
//! # Ok::<(), ingest::IngestError>(())
//! ```
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn, Level};

mod config;
mod decode;
mod discovery;
mod error;

pub use crate::config::{ExtensionFilter, IngestConfig, DEFAULT_EXTENSIONS};
pub use crate::decode::decode_source;
pub use crate::discovery::discover_source_files;
pub use crate::error::{DecodeError, IngestError};

/// One submission directory after loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedSubmission {
    /// Directory name of the submission.
    pub name: String,
    /// Normalized text of every file, each followed by `\n`.
    pub code: String,
    /// Source files in concatenation order.
    pub files: Vec<PathBuf>,
    /// Files that could not be decoded and were read as empty.
    pub undecodable: Vec<PathBuf>,
}

/// Loads one submission directory.
pub fn load_submission(dir: &Path, cfg: &IngestConfig) -> Result<LoadedSubmission, IngestError> {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());

    let files = discover_source_files(dir, &cfg.extensions)?;
    let mut code = String::new();
    let mut undecodable = Vec::new();

    for path in &files {
        let bytes = fs::read(path).map_err(|e| IngestError::io(path, e))?;
        let text = match decode_source(&bytes) {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    submission = %name,
                    path = %path.display(),
                    error = %err,
                    "decode_failure"
                );
                undecodable.push(path.clone());
                String::new()
            }
        };
        code.push_str(&canonical::normalize(&text, &cfg.policy));
        code.push('\n');
    }

    Ok(LoadedSubmission {
        name,
        code,
        files,
        undecodable,
    })
}

/// Loads every immediate subdirectory of `root` as a submission, in name
/// order. Loose files directly under `root` are ignored.
pub fn load_assignment(
    root: &Path,
    cfg: &IngestConfig,
) -> Result<Vec<LoadedSubmission>, IngestError> {
    let start = Instant::now();
    cfg.validate()?;
    if !root.is_dir() {
        return Err(IngestError::NotADirectory(root.to_path_buf()));
    }

    let span = tracing::span!(
        Level::INFO,
        "ingest.load_assignment",
        root = %root.display()
    );
    let _guard = span.enter();

    let (_, dirs) = discovery::list_dir(root)?;
    let result: Result<Vec<_>, _> = dirs
        .par_iter()
        .map(|dir| load_submission(dir, cfg))
        .collect();

    let elapsed_micros = start.elapsed().as_micros();
    match result {
        Ok(submissions) => {
            let files: usize = submissions.iter().map(|s| s.files.len()).sum();
            let undecodable: usize = submissions.iter().map(|s| s.undecodable.len()).sum();
            info!(
                submissions = submissions.len(),
                files,
                undecodable,
                policy = %cfg.policy,
                elapsed_micros,
                "assignment_loaded"
            );
            Ok(submissions)
        }
        Err(err) => {
            warn!(error = %err, elapsed_micros, "assignment_load_failure");
            Err(err)
        }
    }
}
