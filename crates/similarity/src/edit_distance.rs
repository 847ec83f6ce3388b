//! Levenshtein distance over Unicode scalar values.

use crate::config::SimilarityError;
use crate::SimilarityMetric;

/// Edit-distance scorer. Stateless; comparisons are exact (no case or
/// Unicode folding).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditDistance;

impl EditDistance {
    pub fn new() -> Self {
        Self
    }

    /// Minimum number of single-codepoint insertions, deletions and
    /// substitutions turning `a` into `b`.
    pub fn edit_distance(&self, a: &str, b: &str) -> usize {
        levenshtein(a, b)
    }

    /// `1 - d / max(|a|, |b|)`, with two empty strings scoring 1.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        let longest = a.chars().count().max(b.chars().count());
        if longest == 0 {
            return 1.0;
        }
        1.0 - levenshtein(a, b) as f64 / longest as f64
    }
}

impl SimilarityMetric for EditDistance {
    fn similarity(&self, a: &str, b: &str) -> Result<f64, SimilarityError> {
        Ok(EditDistance::similarity(self, a, b))
    }
}

/// Two-row Levenshtein, walking both strings from the end. The row is
/// indexed by the shorter string.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return long.len();
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut cur = vec![0usize; short.len() + 1];

    for (i, &lc) in long.iter().rev().enumerate() {
        cur[0] = i + 1;
        for (j, &sc) in short.iter().rev().enumerate() {
            cur[j + 1] = if lc == sc {
                prev[j]
            } else {
                1 + prev[j].min(prev[j + 1]).min(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[short.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_distances() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn symmetric() {
        let pairs = [("kitten", "sitting"), ("a", "xyz"), ("int x=1;", "int y = 2;")];
        for (a, b) in pairs {
            assert_eq!(levenshtein(a, b), levenshtein(b, a));
        }
    }

    #[test]
    fn similarity_scenarios() {
        let ed = EditDistance::new();
        assert_eq!(ed.similarity("abc", "abc"), 1.0);
        assert!((ed.similarity("abc", "abd") - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(ed.similarity("", ""), 1.0);
        assert_eq!(ed.similarity("", "abc"), 0.0);
    }

    #[test]
    fn counts_codepoints_not_bytes() {
        assert_eq!(levenshtein("héllo", "hello"), 1);
        assert_eq!(levenshtein("日本語", "日本"), 1);
        assert!((EditDistance.similarity("日本語", "日本") - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn case_sensitive() {
        assert_eq!(levenshtein("Main", "main"), 1);
    }

    #[test]
    fn metric_trait_never_fails() {
        let metric: &dyn SimilarityMetric = &EditDistance;
        assert_eq!(metric.similarity("abc", "abc"), Ok(1.0));
    }
}
