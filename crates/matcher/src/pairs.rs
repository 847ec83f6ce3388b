//! Linearized pair space.
//!
//! The unordered pairs `(i, j)`, `i < j < n`, are numbered row-major:
//! `(0,1), (0,2), .., (0,n-1), (1,2), ..`. Row `i` starts at
//! `i * (2n - i - 1) / 2`.

use std::collections::HashMap;

use crate::types::PairRecord;

/// `n * (n - 1) / 2`.
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

fn row_offset(i: usize, n: usize) -> usize {
    i * (2 * n - i - 1) / 2
}

/// The pair at linear `index`. `index` must be below `pair_count(n)`.
pub fn pair_at(index: usize, n: usize) -> (usize, usize) {
    debug_assert!(index < pair_count(n));
    // Largest row whose offset is <= index.
    let (mut lo, mut hi) = (0usize, n - 1);
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if row_offset(mid, n) <= index {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    let i = lo;
    (i, i + 1 + (index - row_offset(i, n)))
}

/// Iterates pairs in linear order starting at `start`.
#[derive(Debug, Clone)]
pub struct PairCursor {
    n: usize,
    next: Option<(usize, usize)>,
}

impl PairCursor {
    pub fn new(n: usize, start: usize) -> Self {
        let next = (start < pair_count(n)).then(|| pair_at(start, n));
        Self { n, next }
    }
}

impl Iterator for PairCursor {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (i, j) = self.next?;
        self.next = if j + 1 < self.n {
            Some((i, j + 1))
        } else if i + 2 < self.n {
            Some((i + 1, i + 2))
        } else {
            None
        };
        Some((i, j))
    }
}

/// Highest similarity per submission name over all pairs touching it.
pub fn highest_similarities(pairs: &[PairRecord]) -> HashMap<String, f64> {
    let mut highest: HashMap<String, f64> = HashMap::new();
    for pair in pairs {
        for name in [&pair.first, &pair.second] {
            highest
                .entry(name.clone())
                .and_modify(|best| {
                    if pair.similarity > *best {
                        *best = pair.similarity;
                    }
                })
                .or_insert(pair.similarity);
        }
    }
    highest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested(n: usize) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for i in 0..n {
            for j in i + 1..n {
                out.push((i, j));
            }
        }
        out
    }

    #[test]
    fn counts() {
        assert_eq!(pair_count(0), 0);
        assert_eq!(pair_count(1), 0);
        assert_eq!(pair_count(2), 1);
        assert_eq!(pair_count(10), 45);
    }

    #[test]
    fn unranking_matches_nested_loops() {
        for n in 2..25 {
            let expected = nested(n);
            for (index, pair) in expected.iter().enumerate() {
                assert_eq!(pair_at(index, n), *pair, "n={n} index={index}");
            }
        }
    }

    #[test]
    fn cursor_walks_from_any_start() {
        for n in 0..12 {
            let expected = nested(n);
            for start in 0..=expected.len() {
                let walked: Vec<_> = PairCursor::new(n, start).collect();
                assert_eq!(walked, expected[start..], "n={n} start={start}");
            }
        }
    }

    #[test]
    fn highest_takes_max_per_name() {
        let pairs = vec![
            PairRecord::new("a", "b", 0.3),
            PairRecord::new("a", "c", 0.7),
            PairRecord::new("b", "c", 0.1),
        ];
        let highest = highest_similarities(&pairs);
        assert_eq!(highest["a"], 0.7);
        assert_eq!(highest["b"], 0.3);
        assert_eq!(highest["c"], 0.7);
        assert!(highest_similarities(&[]).is_empty());
    }
}
