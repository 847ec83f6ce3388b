//! Rendering of a [`ScreeningReport`]: CSV export and console summary.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use matcher::ScreeningReport;
use thiserror::Error;

pub const ITEMS_CSV: &str = "submission_items.csv";
pub const PAIRS_CSV: &str = "submission_item_pairs.csv";

const ITEMS_HEADER: [&str; 5] = [
    "Name",
    "Highest Similarity",
    "Compression Ratio",
    "Normalized Size",
    "Compressed Size",
];
const PAIRS_HEADER: [&str; 3] = ["Name 1", "Name 2", "Similarity"];

/// Placeholder for columns of submissions that were never compared.
const NOT_CHECKED: &str = "---";

/// Names per line in the skipped list of the summary.
const SKIPPED_PER_LINE: usize = 10;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_CHECKED.to_string(), |v| v.to_string())
}

/// Writes one row per submission: compared ones first (report order), then
/// the skipped ones with every metric column set to `---`.
pub fn write_items_csv<W: io::Write>(report: &ScreeningReport, writer: W) -> Result<(), ReportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(ITEMS_HEADER)?;
    for item in &report.accepted {
        csv.write_record([
            item.name.clone(),
            format_optional(item.highest_similarity),
            format_optional(item.compression_ratio),
            item.uncompressed_size.to_string(),
            item.compressed_size.to_string(),
        ])?;
    }
    for item in &report.skipped {
        csv.write_record([
            item.name.as_str(),
            NOT_CHECKED,
            NOT_CHECKED,
            NOT_CHECKED,
            NOT_CHECKED,
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes every pair in report order.
pub fn write_pairs_csv<W: io::Write>(report: &ScreeningReport, writer: W) -> Result<(), ReportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(PAIRS_HEADER)?;
    for pair in &report.pairs {
        csv.write_record([
            pair.first.as_str(),
            pair.second.as_str(),
            pair.similarity.to_string().as_str(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes [`ITEMS_CSV`] and [`PAIRS_CSV`] into `dir` and returns their paths.
pub fn write_csv_files(report: &ScreeningReport, dir: &Path) -> Result<(PathBuf, PathBuf), ReportError> {
    let items_path = dir.join(ITEMS_CSV);
    let pairs_path = dir.join(PAIRS_CSV);

    let open = |path: &Path| {
        std::fs::File::create(path).map_err(|e| ReportError::Write {
            path: path.to_path_buf(),
            source: csv::Error::from(e),
        })
    };
    write_items_csv(report, open(&items_path)?)?;
    write_pairs_csv(report, open(&pairs_path)?)?;

    tracing::info!(
        items = %items_path.display(),
        pairs = %pairs_path.display(),
        "csv_written"
    );
    Ok((items_path, pairs_path))
}

/// Console summary of a screening run.
///
/// Names are right-aligned to six columns; scores use four decimals.
pub struct Summary<'a> {
    pub assignment: &'a str,
    pub report: &'a ScreeningReport,
    pub top_pairs: usize,
    pub top_items: usize,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        writeln!(f, "Summary for {}", self.assignment)?;
        writeln!(f)?;
        writeln!(f, "Total Submission Items: {}", report.total())?;
        writeln!(f, "Submission Items Checked: {}", report.accepted.len())?;
        writeln!(f, "Submission Items Skipped: {}", report.skipped.len())?;

        if !report.skipped.is_empty() {
            writeln!(f, "  The following submission items were too short to")?;
            write!(f, "  check for similarity:")?;
            for (i, item) in report.skipped.iter().enumerate() {
                if i % SKIPPED_PER_LINE == 0 {
                    write!(f, "\n    {:>6}", item.name)?;
                } else {
                    write!(f, " {:>6}", item.name)?;
                }
            }
            writeln!(f)?;
        }
        writeln!(f)?;

        writeln!(f, "Submission Item Pairs by Highest Similarity")?;
        for pair in report.top_pairs(self.top_pairs) {
            writeln!(
                f,
                "  ( {:>6} {:>6} ) : {:.4}",
                pair.first, pair.second, pair.similarity
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Submission Items by Highest Compression Ratio")?;
        for item in report.top_items(self.top_items) {
            match item.compression_ratio {
                Some(ratio) => writeln!(f, "  {:>6} : {ratio:.4}", item.name)?,
                None => writeln!(f, "  {:>6} : {NOT_CHECKED}", item.name)?,
            }
        }
        Ok(())
    }
}
