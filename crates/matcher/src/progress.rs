//! Advisory progress reporting for the pairwise phase.
//!
//! Observers are called from worker threads after each chunk; the counts
//! they see are monotonic per call site but may arrive out of order across
//! threads. Nothing in the scheduler depends on them.

/// Receives pairwise progress.
pub trait ProgressObserver: Send + Sync {
    fn on_start(&self, _total: usize) {}

    fn on_progress(&self, completed: usize, total: usize);

    fn on_finish(&self, _completed: usize, _total: usize) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _completed: usize, _total: usize) {}
}

impl<F> ProgressObserver for F
where
    F: Fn(usize, usize) + Send + Sync,
{
    fn on_progress(&self, completed: usize, total: usize) {
        self(completed, total)
    }
}
