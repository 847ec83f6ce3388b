use std::cmp::Ordering;
use std::collections::HashSet;
use std::time::Instant;

use rayon::prelude::*;
use similarity::CompressionSimilarity;
use tracing::{info, warn, Level};

use crate::pairs::highest_similarities;
use crate::progress::ProgressObserver;
use crate::scheduler::PairwiseScheduler;
use crate::types::{
    MatchConfig, MatchError, PairRecord, ScreeningReport, Submission, SubmissionItem,
    SubmissionSummary,
};

#[cfg(test)]
mod tests;

/// Screens a submission set for suspiciously similar pairs.
#[derive(Debug)]
pub struct Screener {
    config: MatchConfig,
    similarity: CompressionSimilarity,
}

impl Screener {
    pub fn new(config: MatchConfig, similarity: CompressionSimilarity) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self { config, similarity })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn similarity(&self) -> &CompressionSimilarity {
        &self.similarity
    }

    /// Runs the whole screening: threshold split, compression, pairwise
    /// scoring, highest-similarity reduction and sorting.
    pub fn screen(
        &self,
        submissions: Vec<Submission>,
        progress: &dyn ProgressObserver,
    ) -> Result<ScreeningReport, MatchError> {
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "matcher.screen",
            submissions = submissions.len(),
            min_size_bytes = self.config.min_size_bytes
        );
        let _guard = span.enter();

        let mut seen = HashSet::with_capacity(submissions.len());
        for submission in &submissions {
            if !seen.insert(submission.name.as_str()) {
                warn!(name = %submission.name, "duplicate_submission_name");
                return Err(MatchError::DuplicateName(submission.name.clone()));
            }
        }

        let (mut accepted, skipped): (Vec<_>, Vec<_>) = submissions
            .into_iter()
            .map(SubmissionItem::new)
            .partition(|item| item.uncompressed_size() >= self.config.min_size_bytes);

        for item in &skipped {
            info!(
                name = item.name(),
                size = item.uncompressed_size(),
                "submission_below_threshold"
            );
        }

        accepted.par_iter_mut().try_for_each(|item| {
            let compressed = self.similarity.compress_text(item.code())?;
            item.attach_compressed(compressed);
            Ok::<(), MatchError>(())
        })?;

        let pairs = self.score_pairs(&accepted, progress)?;

        // Post-barrier reduction; nothing below runs concurrently.
        let highest = highest_similarities(&pairs);
        for item in &mut accepted {
            if let Some(&score) = highest.get(item.name()) {
                item.observe_similarity(score);
            }
        }

        let report = build_report(&accepted, &skipped, pairs);
        let elapsed_micros = start.elapsed().as_micros();
        info!(
            accepted = report.accepted.len(),
            skipped = report.skipped.len(),
            pairs = report.pairs.len(),
            compressor = self.similarity.compressor().name(),
            elapsed_micros,
            "screening_complete"
        );
        Ok(report)
    }

    fn score_pairs(
        &self,
        items: &[SubmissionItem],
        progress: &dyn ProgressObserver,
    ) -> Result<Vec<PairRecord>, MatchError> {
        let scheduler =
            PairwiseScheduler::new(self.config.effective_workers(), self.config.chunk_size)?;
        scheduler.run(
            items.len(),
            |i, j| {
                let (a, b) = (&items[i], &items[j]);
                let score = self.similarity.similarity_with_sizes(
                    a.code(),
                    b.code(),
                    a.compressed_size(),
                    b.compressed_size(),
                )?;
                Ok(PairRecord::new(a.name(), b.name(), score))
            },
            progress,
        )
    }
}

/// Similarity descending, ties by pair identity.
fn compare_pairs(a: &PairRecord, b: &PairRecord) -> Ordering {
    b.similarity
        .total_cmp(&a.similarity)
        .then_with(|| a.first.cmp(&b.first))
        .then_with(|| a.second.cmp(&b.second))
}

/// Compression ratio descending, ties by name.
fn compare_items(a: &SubmissionSummary, b: &SubmissionSummary) -> Ordering {
    let ratio = |s: &SubmissionSummary| s.compression_ratio.unwrap_or(0.0);
    ratio(b)
        .total_cmp(&ratio(a))
        .then_with(|| a.name.cmp(&b.name))
}

fn build_report(
    accepted: &[SubmissionItem],
    skipped: &[SubmissionItem],
    mut pairs: Vec<PairRecord>,
) -> ScreeningReport {
    pairs.sort_by(compare_pairs);

    let mut accepted: Vec<_> = accepted.iter().map(SubmissionSummary::accepted).collect();
    accepted.sort_by(compare_items);

    ScreeningReport {
        accepted,
        skipped: skipped.iter().map(SubmissionSummary::skipped).collect(),
        pairs,
    }
}
