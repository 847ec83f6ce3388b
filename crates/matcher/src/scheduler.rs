//! Chunk-claiming pairwise scheduler.
//!
//! A fixed rayon pool runs one worker loop per thread via
//! [`rayon::ThreadPool::broadcast`]. Workers claim `chunk_size` consecutive
//! pair indices with a single `fetch_add`, score them in order and keep the
//! results in a worker-local `Vec`. The only shared state while workers run
//! is the claim counter, the completed counter and the abort flag.
//!
//! After the barrier the worker vectors are concatenated in worker order.
//! Which worker scored which chunk depends on timing, so the order of the
//! returned results is unspecified; the set is complete and exactly-once.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use tracing::{info, warn};

use crate::pairs::{pair_count, PairCursor};
use crate::progress::ProgressObserver;
use crate::types::MatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairwiseScheduler {
    workers: usize,
    chunk_size: usize,
}

impl PairwiseScheduler {
    pub fn new(workers: usize, chunk_size: usize) -> Result<Self, MatchError> {
        if workers == 0 {
            return Err(MatchError::InvalidConfig(
                "workers must be greater than zero".into(),
            ));
        }
        if chunk_size == 0 {
            return Err(MatchError::InvalidConfig(
                "chunk_size must be greater than zero".into(),
            ));
        }
        Ok(Self {
            workers,
            chunk_size,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Scores every pair `(i, j)`, `i < j < n`, exactly once.
    ///
    /// The first scorer error stops further claims; workers finish the pair
    /// they are on and the error of the lowest-numbered failing worker is
    /// returned after all of them have joined.
    pub fn run<T, F>(
        &self,
        n: usize,
        score: F,
        progress: &dyn ProgressObserver,
    ) -> Result<Vec<T>, MatchError>
    where
        T: Send,
        F: Fn(usize, usize) -> Result<T, MatchError> + Sync,
    {
        let start = Instant::now();
        let total = pair_count(n);
        progress.on_start(total);
        if total == 0 {
            progress.on_finish(0, 0);
            return Ok(Vec::new());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("simscreen-pairs-{i}"))
            .build()
            .map_err(|e| MatchError::WorkerPool(e.to_string()))?;

        let chunk = self.chunk_size;
        let next = AtomicUsize::new(0);
        let completed = AtomicUsize::new(0);
        let abort = AtomicBool::new(false);

        let per_worker: Vec<Result<Vec<T>, MatchError>> = pool.broadcast(|_| {
            let mut local = Vec::new();
            while !abort.load(Ordering::Relaxed) {
                let begin = next.fetch_add(chunk, Ordering::Relaxed);
                if begin >= total {
                    break;
                }
                let end = (begin + chunk).min(total);
                for (i, j) in PairCursor::new(n, begin).take(end - begin) {
                    match score(i, j) {
                        Ok(result) => local.push(result),
                        Err(err) => {
                            abort.store(true, Ordering::Relaxed);
                            return Err(err);
                        }
                    }
                }
                let done = completed.fetch_add(end - begin, Ordering::Relaxed) + (end - begin);
                progress.on_progress(done, total);
            }
            Ok(local)
        });

        let mut results = Vec::with_capacity(total);
        for worker in per_worker {
            match worker {
                Ok(local) => results.extend(local),
                Err(err) => {
                    let done = completed.load(Ordering::Relaxed);
                    warn!(error = %err, completed = done, total, "pairwise_aborted");
                    progress.on_finish(done, total);
                    return Err(err);
                }
            }
        }

        let elapsed_micros = start.elapsed().as_micros();
        info!(
            pairs = results.len(),
            workers = self.workers,
            chunk_size = chunk,
            elapsed_micros,
            "pairwise_complete"
        );
        progress.on_finish(results.len(), total);
        Ok(results)
    }
}
