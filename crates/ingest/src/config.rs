//! Configuration types for submission loading.
//!
//! [`IngestConfig`] pairs the [`ExtensionFilter`] deciding which files count
//! as source with the [`ProcessingPolicy`] applied to each decoded file.
//!
//! ```rust
//! use ingest::{ExtensionFilter, IngestConfig};
//! use canonical::ProcessingPolicy;
//!
//! let config = IngestConfig::default()
//!     .with_extensions(ExtensionFilter::new([".py", "PYI"]).unwrap())
//!     .with_policy(ProcessingPolicy::strict());
//! config.validate().unwrap();
//!
//! assert!(config.extensions.matches(std::path::Path::new("pkg/stub.pyi")));
//! ```
use std::path::Path;

use canonical::ProcessingPolicy;
use serde::{Deserialize, Serialize};

use crate::error::IngestError;

/// Extensions recognised when no filter is configured.
pub const DEFAULT_EXTENSIONS: [&str; 5] = [".cpp", ".c", ".hpp", ".h", ".txt"];

/// Case-insensitive set of accepted file extensions.
///
/// Entries are stored lowercase without the leading dot, so `.cpp`, `CPP`
/// and `cpp` all describe the same extension. Only the final extension of a
/// path is compared (`a.tar.gz` has extension `gz`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ExtensionFilter {
    extensions: Vec<String>,
}

impl ExtensionFilter {
    pub fn new<I, S>(extensions: I) -> Result<Self, IngestError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized = Vec::new();
        for raw in extensions {
            let raw = raw.as_ref();
            let ext = raw.trim().trim_start_matches('.').to_ascii_lowercase();
            if ext.is_empty() {
                return Err(IngestError::InvalidConfig(format!(
                    "empty file extension `{raw}`"
                )));
            }
            if !normalized.contains(&ext) {
                normalized.push(ext);
            }
        }
        Ok(Self {
            extensions: normalized,
        })
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|accepted| accepted.eq_ignore_ascii_case(ext))
            })
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Extensions with their leading dot, in configuration order.
    pub fn dotted(&self) -> Vec<String> {
        self.extensions.iter().map(|ext| format!(".{ext}")).collect()
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect(),
        }
    }
}

impl TryFrom<Vec<String>> for ExtensionFilter {
    type Error = IngestError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExtensionFilter> for Vec<String> {
    fn from(filter: ExtensionFilter) -> Self {
        filter.dotted()
    }
}

/// Runtime configuration for loading submissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub extensions: ExtensionFilter,
    pub policy: ProcessingPolicy,
}

impl IngestConfig {
    pub fn with_extensions(mut self, extensions: ExtensionFilter) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_policy(mut self, policy: ProcessingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn validate(&self) -> Result<(), IngestError> {
        if self.extensions.is_empty() {
            return Err(IngestError::InvalidConfig(
                "at least one source file extension is required".into(),
            ));
        }
        Ok(())
    }
}
