use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use simscreen::report::{Summary, write_csv_files};
use simscreen::{
    CommentPolicy, CompressorKind, ContentPolicy, ExtensionFilter, NoProgress, ProgressObserver,
    SimscreenConfig, StringPolicy, WhitespacePolicy, run_screening,
};

#[derive(Parser, Debug)]
#[command(
    name = "simscreen",
    version,
    about = "Screen a directory of source-code submissions for suspiciously similar pairs"
)]
struct Cli {
    /// Assignment directory; every subdirectory is one submission
    dir: PathBuf,

    /// File extensions to analyze, e.g. `.cpp .c .hpp .h` (replaces the configured set)
    extensions: Vec<String>,

    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip submissions whose normalized code is shorter than this many bytes
    #[arg(long)]
    min_size: Option<usize>,

    /// Worker threads for pairwise scoring (default: available parallelism)
    #[arg(long)]
    workers: Option<usize>,

    /// Pairs claimed per worker at a time
    #[arg(long)]
    chunk_size: Option<usize>,

    /// keep | collapse
    #[arg(long)]
    whitespace: Option<WhitespacePolicy>,

    /// keep | obscure-identifiers | obscure | obscure-collapse-identifiers | obscure-collapse | drop-identifiers | drop-all
    #[arg(long)]
    content: Option<ContentPolicy>,

    /// keep | drop-content
    #[arg(long)]
    strings: Option<StringPolicy>,

    /// keep | drop-content | remove
    #[arg(long)]
    comments: Option<CommentPolicy>,

    /// zstd | deflate
    #[arg(long)]
    compressor: Option<CompressorKind>,

    /// Compression level for the chosen compressor
    #[arg(long)]
    level: Option<i32>,

    /// Directory for the CSV files (default: the assignment directory)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Do not write CSV files
    #[arg(long, default_value_t = false)]
    no_csv: bool,

    /// Only log warnings and hide the progress bar
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}

impl Cli {
    fn into_config(self) -> Result<(PathBuf, bool, SimscreenConfig)> {
        let mut cfg = match &self.config {
            Some(path) => SimscreenConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => SimscreenConfig::default(),
        };

        if !self.extensions.is_empty() {
            cfg.ingest.extensions = ExtensionFilter::new(&self.extensions)?;
        }
        if let Some(min_size) = self.min_size {
            cfg.matcher.min_size_bytes = min_size;
        }
        if let Some(workers) = self.workers {
            cfg.matcher.workers = Some(workers);
        }
        if let Some(chunk_size) = self.chunk_size {
            cfg.matcher.chunk_size = chunk_size;
        }
        if let Some(whitespace) = self.whitespace {
            cfg.normalizer.whitespace = whitespace;
        }
        if let Some(content) = self.content {
            cfg.normalizer.content = content;
        }
        if let Some(strings) = self.strings {
            cfg.normalizer.strings = strings;
        }
        if let Some(comments) = self.comments {
            cfg.normalizer.comments = comments;
        }
        if let Some(compressor) = self.compressor {
            cfg.similarity.compressor = compressor;
            // A level tuned for one backend rarely fits the other.
            cfg.similarity.level = None;
        }
        if let Some(level) = self.level {
            cfg.similarity.level = Some(level);
        }
        if let Some(dir) = self.output_dir {
            cfg.report.output_dir = Some(dir);
        }
        if self.no_csv {
            cfg.report.write_csv = false;
        }

        cfg.validate()?;
        Ok((self.dir, self.quiet, cfg))
    }
}

/// Progress bar over the pairwise phase.
struct BarProgress {
    bar: ProgressBar,
    shown: AtomicU64,
}

impl BarProgress {
    fn new() -> Result<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(ProgressStyle::with_template(
            "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} pairs ({percent}%)",
        )?);
        Ok(Self {
            bar,
            shown: AtomicU64::new(0),
        })
    }
}

impl ProgressObserver for BarProgress {
    fn on_start(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn on_progress(&self, completed: usize, _total: usize) {
        // Workers report out of order; never move the bar backwards.
        let completed = completed as u64;
        if self.shown.fetch_max(completed, Ordering::Relaxed) < completed {
            self.bar.set_position(completed);
        }
    }

    fn on_finish(&self, _completed: usize, _total: usize) {
        self.bar.finish_and_clear();
    }
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet);
    let (dir, quiet, cfg) = cli.into_config()?;

    let run = if quiet {
        run_screening(&dir, &cfg, &NoProgress)?
    } else {
        run_screening(&dir, &cfg, &BarProgress::new()?)?
    };

    print!(
        "{}",
        Summary {
            assignment: &run.assignment,
            report: &run.report,
            top_pairs: cfg.report.top_pairs,
            top_items: cfg.report.top_items,
        }
    );
    if !run.undecodable.is_empty() {
        println!();
        println!("Files read as empty (could not be decoded):");
        for path in &run.undecodable {
            println!("  {}", path.display());
        }
    }

    if cfg.report.write_csv {
        let out_dir = cfg.report.output_dir.clone().unwrap_or_else(|| dir.clone());
        let (items, pairs) = write_csv_files(&run.report, &out_dir)
            .with_context(|| format!("writing CSV files to {}", out_dir.display()))?;
        println!();
        println!("Wrote {}", items.display());
        println!("Wrote {}", pairs.display());
    }

    Ok(())
}
