//! YAML configuration file support for simscreen.
//!
//! Every stage can be configured from one YAML file. All sections and fields
//! are optional; missing values take the same defaults as the library types.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "cs101 assignment 3"
//!
//! normalizer:
//!   whitespace: collapse
//!   content: keep
//!   strings: drop-content
//!   comments: remove
//!
//! similarity:
//!   compressor: zstd
//!   level: 9
//!
//! matcher:
//!   min_size_bytes: 250
//!   workers: 8
//!   chunk_size: 4
//!
//! ingest:
//!   extensions: [".cpp", ".c", ".hpp", ".h", ".txt"]
//!
//! report:
//!   top_pairs: 20
//!   top_items: 5
//!   write_csv: true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use canonical::ProcessingPolicy;
use ingest::{ExtensionFilter, IngestConfig};
use matcher::MatchConfig;
use serde::{Deserialize, Serialize};
use similarity::SimilarityConfig;
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration for a screening run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SimscreenConfig {
    /// Configuration format version
    #[serde(default = "default_version")]
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub normalizer: ProcessingPolicy,

    #[serde(default)]
    pub similarity: SimilarityConfig,

    #[serde(default)]
    pub matcher: MatchConfig,

    #[serde(default)]
    pub ingest: IngestYamlConfig,

    #[serde(default)]
    pub report: ReportYamlConfig,
}

impl SimscreenConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: SimscreenConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.similarity
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("similarity: {e}")))?;
        self.matcher
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("matcher: {e}")))?;
        self.ingest_config()
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("ingest: {e}")))?;
        self.report.validate()?;

        Ok(())
    }

    /// Ingest settings with the normalizer policy folded in.
    pub fn ingest_config(&self) -> IngestConfig {
        IngestConfig::default()
            .with_extensions(self.ingest.extensions.clone())
            .with_policy(self.normalizer)
    }
}

impl Default for SimscreenConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            name: None,
            normalizer: ProcessingPolicy::default(),
            similarity: SimilarityConfig::default(),
            matcher: MatchConfig::default(),
            ingest: IngestYamlConfig::default(),
            report: ReportYamlConfig::default(),
        }
    }
}

/// Ingest section YAML configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestYamlConfig {
    #[serde(default)]
    pub extensions: ExtensionFilter,
}

/// Report section YAML configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportYamlConfig {
    /// Pairs listed in the console summary.
    #[serde(default = "default_top_pairs")]
    pub top_pairs: usize,

    /// Submissions listed by compression ratio in the console summary.
    #[serde(default = "default_top_items")]
    pub top_items: usize,

    #[serde(default = "true_value")]
    pub write_csv: bool,

    /// Where the CSV files go; defaults to the assignment directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl ReportYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if let Some(dir) = &self.output_dir {
            if dir.as_os_str().is_empty() {
                return Err(ConfigLoadError::Validation(
                    "report.output_dir must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for ReportYamlConfig {
    fn default() -> Self {
        Self {
            top_pairs: default_top_pairs(),
            top_items: default_top_items(),
            write_csv: true,
            output_dir: None,
        }
    }
}

fn default_version() -> String {
    "1.0".to_string()
}
fn true_value() -> bool {
    true
}
fn default_top_pairs() -> usize {
    20
}
fn default_top_items() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;
    use canonical::{CommentPolicy, ContentPolicy, StringPolicy, WhitespacePolicy};
    use similarity::CompressorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_yaml() {
        let yaml = r#"
version: "1.0"
name: "test config"
normalizer:
  whitespace: collapse
  comments: remove
matcher:
  min_size_bytes: 100
"#;

        let config = SimscreenConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.name, Some("test config".to_string()));
        assert_eq!(config.normalizer.whitespace, WhitespacePolicy::Collapse);
        assert_eq!(config.normalizer.comments, CommentPolicy::Remove);
        assert_eq!(config.normalizer.strings, StringPolicy::Keep);
        assert_eq!(config.matcher.min_size_bytes, 100);
        assert_eq!(config.matcher.chunk_size, 4);
        assert_eq!(config.report.top_pairs, 20);
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
version: "1"
similarity:
  compressor: deflate
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = SimscreenConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.similarity.compressor, CompressorKind::Deflate);
    }

    #[test]
    fn test_missing_file() {
        let result = SimscreenConfig::from_file("/definitely/not/here.yaml");
        assert!(matches!(result, Err(ConfigLoadError::FileRead(_))));
    }

    #[test]
    fn test_default_config() {
        let config = SimscreenConfig::default();
        assert_eq!(config.version, "1.0");
        assert!(config.name.is_none());
        assert!(config.validate().is_ok());
        assert!(config.report.write_csv);
        assert_eq!(config.ingest.extensions, ExtensionFilter::default());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = SimscreenConfig::from_yaml("{}").unwrap();
        assert_eq!(config, SimscreenConfig::default());
    }

    #[test]
    fn test_unsupported_version() {
        let result = SimscreenConfig::from_yaml("version: \"2\"\n");
        assert!(matches!(
            result,
            Err(ConfigLoadError::UnsupportedVersion(v)) if v == "2"
        ));
    }

    #[test]
    fn test_stage_validation() {
        let yaml = r#"
version: "1.0"
matcher:
  chunk_size: 0
"#;
        let err = SimscreenConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("chunk_size"), "{err}");

        let yaml = r#"
version: "1.0"
similarity:
  compressor: deflate
  level: 12
"#;
        let err = SimscreenConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("similarity"), "{err}");

        let yaml = r#"
version: "1.0"
ingest:
  extensions: []
"#;
        let err = SimscreenConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("extension"), "{err}");
    }

    #[test]
    fn test_unknown_policy_name_is_parse_error() {
        let yaml = r#"
version: "1.0"
normalizer:
  content: scramble
"#;
        assert!(matches!(
            SimscreenConfig::from_yaml(yaml),
            Err(ConfigLoadError::YamlParse(_))
        ));
    }

    #[test]
    fn test_full_yaml_roundtrip() {
        let yaml = r#"
version: "1.0"
name: "strict screening"
normalizer:
  whitespace: collapse
  content: obscure-collapse-identifiers
  strings: drop-content
  comments: remove
similarity:
  compressor: zstd
  level: 15
matcher:
  min_size_bytes: 300
  workers: 2
  chunk_size: 8
ingest:
  extensions: ["CPP", ".cc"]
report:
  top_pairs: 10
  top_items: 3
  write_csv: false
  output_dir: "reports"
"#;

        let config = SimscreenConfig::from_yaml(yaml).unwrap();
        assert_eq!(
            config.normalizer.content,
            ContentPolicy::ObscureCollapseIdentifiers
        );
        assert_eq!(config.similarity.effective_level(), 15);
        assert_eq!(config.matcher.workers, Some(2));
        assert_eq!(config.ingest.extensions.dotted(), vec![".cpp", ".cc"]);
        assert!(!config.report.write_csv);
        assert_eq!(config.report.output_dir, Some(PathBuf::from("reports")));

        let reparsed = SimscreenConfig::from_yaml(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(reparsed, config);
    }
}
