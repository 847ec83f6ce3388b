use super::*;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use similarity::{Compressor, DeflateCompressor, SimilarityError};

use crate::progress::NoProgress;

const BASE: &str = "#include<iostream>\nint main(){int total=0;for(int i=0;i<100;++i){if(i%3==0){total+=i*i;}else{total-=i;}}std::cout<<total<<std::endl;return 0;}\n";

fn program(seed: usize) -> String {
    // Distinct but structurally similar bodies, all above 250 bytes.
    let mut code = String::new();
    for k in 0..6 {
        code.push_str(&format!(
            "int f{seed}_{k}(int a{k}){{return a{k}*{}+{};}}\n",
            seed * 7 + k,
            seed * 13 % (k + 3)
        ));
    }
    code.push_str(BASE);
    code
}

fn submissions(n: usize) -> Vec<Submission> {
    (0..n)
        .map(|i| Submission::new(format!("student-{i:02}"), program(i)))
        .collect()
}

fn screener(config: MatchConfig) -> Screener {
    Screener::new(config, CompressionSimilarity::default()).unwrap()
}

struct FailingCompressor;

impl Compressor for FailingCompressor {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn compress(&self, _bytes: &[u8]) -> Result<Vec<u8>, SimilarityError> {
        Err(SimilarityError::Compression {
            backend: "failing",
            message: "no space left".into(),
        })
    }
}

#[test]
fn exhaustive_pairs() {
    for n in [0, 1, 2, 5, 9] {
        let report = screener(MatchConfig::default())
            .screen(submissions(n), &NoProgress)
            .unwrap();
        assert_eq!(report.pairs.len(), n * n.saturating_sub(1) / 2, "n={n}");
        assert_eq!(report.accepted.len(), n);
        assert_eq!(report.total(), n);

        let mut seen = HashSet::new();
        for pair in &report.pairs {
            assert_ne!(pair.first, pair.second);
            let key = if pair.first < pair.second {
                (pair.first.clone(), pair.second.clone())
            } else {
                (pair.second.clone(), pair.first.clone())
            };
            assert!(seen.insert(key), "pair scored twice");
        }
    }
}

#[test]
fn deterministic_across_worker_counts() {
    let reference = screener(MatchConfig::default().with_workers(1))
        .screen(submissions(8), &NoProgress)
        .unwrap();
    for (workers, chunk) in [(2, 1), (3, 4), (8, 3), (16, 64)] {
        let config = MatchConfig::default()
            .with_workers(workers)
            .with_chunk_size(chunk);
        let report = screener(config).screen(submissions(8), &NoProgress).unwrap();
        assert_eq!(report, reference, "workers={workers} chunk={chunk}");
    }
}

#[test]
fn small_submission_excluded_under_threshold() {
    let config = MatchConfig::default().with_min_size_bytes(50);
    let input = vec![
        Submission::new("tiny", "int x=1;\n\n"),
        Submission::new("big", program(1)),
    ];
    assert_eq!(input[0].code.len(), 10);

    let report = screener(config).screen(input, &NoProgress).unwrap();
    assert!(report.pairs.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "tiny");
    assert_eq!(report.skipped[0].highest_similarity, None);
    assert_eq!(report.skipped[0].compressed_size, 0);
    assert_eq!(report.accepted.len(), 1);
    assert_eq!(report.accepted[0].highest_similarity, Some(0.0));
}

#[test]
fn threshold_boundary_is_inclusive() {
    let config = MatchConfig::default().with_min_size_bytes(10);
    let input = vec![
        Submission::new("exact", "a".repeat(10)),
        Submission::new("short", "a".repeat(9)),
        Submission::new("long", "a".repeat(11)),
    ];
    let report = screener(config).screen(input, &NoProgress).unwrap();
    let accepted: Vec<_> = report.accepted.iter().map(|s| s.name.as_str()).collect();
    assert!(accepted.contains(&"exact"));
    assert!(accepted.contains(&"long"));
    assert_eq!(report.skipped[0].name, "short");
    assert_eq!(report.pairs.len(), 1);
}

#[test]
fn skipped_keep_input_order() {
    let config = MatchConfig::default();
    let input = vec![
        Submission::new("zed", "int z;"),
        Submission::new("amy", "int a;"),
        Submission::new("kim", "int k;"),
    ];
    let report = screener(config).screen(input, &NoProgress).unwrap();
    let names: Vec<_> = report.skipped.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["zed", "amy", "kim"]);
    assert!(report.accepted.is_empty());
}

#[test]
fn copied_pair_ranks_first() {
    let mut input = submissions(5);
    let copied = input[2].code.replace("total", "sum");
    input.push(Submission::new("copycat", copied));

    let report = screener(MatchConfig::default())
        .screen(input, &NoProgress)
        .unwrap();
    let top = &report.pairs[0];
    let names = [top.first.as_str(), top.second.as_str()];
    assert!(names.contains(&"copycat") && names.contains(&"student-02"), "{top:?}");

    let copycat = report
        .accepted
        .iter()
        .find(|s| s.name == "copycat")
        .unwrap();
    assert_eq!(copycat.highest_similarity, Some(top.similarity));
}

#[test]
fn report_is_sorted() {
    let report = screener(MatchConfig::default())
        .screen(submissions(7), &NoProgress)
        .unwrap();
    for w in report.pairs.windows(2) {
        assert!(w[0].similarity >= w[1].similarity);
    }
    for w in report.accepted.windows(2) {
        assert!(w[0].compression_ratio.unwrap() >= w[1].compression_ratio.unwrap());
    }
    for pair in &report.pairs {
        assert!((0.0..=1.0).contains(&pair.similarity));
    }
}

#[test]
fn highest_similarity_matches_pairs() {
    let report = screener(MatchConfig::default())
        .screen(submissions(6), &NoProgress)
        .unwrap();
    for summary in &report.accepted {
        let best = report
            .pairs
            .iter()
            .filter(|p| p.involves(&summary.name))
            .map(|p| p.similarity)
            .fold(0.0, f64::max);
        assert_eq!(summary.highest_similarity, Some(best), "{}", summary.name);
    }
}

#[test]
fn duplicate_names_rejected() {
    let input = vec![
        Submission::new("dup", program(1)),
        Submission::new("dup", program(2)),
    ];
    assert_eq!(
        screener(MatchConfig::default()).screen(input, &NoProgress),
        Err(MatchError::DuplicateName("dup".into()))
    );
}

#[test]
fn compressor_failure_aborts_screening() {
    let screener = Screener::new(
        MatchConfig::default(),
        CompressionSimilarity::new(FailingCompressor),
    )
    .unwrap();
    let err = screener.screen(submissions(3), &NoProgress).unwrap_err();
    assert!(matches!(
        err,
        MatchError::Similarity(SimilarityError::Compression { backend: "failing", .. })
    ));
}

#[test]
fn failure_with_only_skipped_items_is_harmless() {
    let screener = Screener::new(
        MatchConfig::default(),
        CompressionSimilarity::new(FailingCompressor),
    )
    .unwrap();
    let report = screener
        .screen(vec![Submission::new("tiny", "x")], &NoProgress)
        .unwrap();
    assert_eq!(report.skipped.len(), 1);
}

#[test]
fn deflate_backend_works_end_to_end() {
    let screener = Screener::new(
        MatchConfig::default().with_workers(2),
        CompressionSimilarity::new(DeflateCompressor::default()),
    )
    .unwrap();
    let report = screener.screen(submissions(4), &NoProgress).unwrap();
    assert_eq!(report.pairs.len(), 6);
}

#[test]
fn progress_observer_sees_all_pairs() {
    let total_seen = AtomicUsize::new(0);
    let max_done = AtomicUsize::new(0);
    let observer = |done: usize, total: usize| {
        total_seen.store(total, AtomicOrdering::Relaxed);
        max_done.fetch_max(done, AtomicOrdering::Relaxed);
    };
    screener(MatchConfig::default().with_workers(3))
        .screen(submissions(6), &observer)
        .unwrap();
    assert_eq!(total_seen.load(AtomicOrdering::Relaxed), 15);
    assert_eq!(max_done.load(AtomicOrdering::Relaxed), 15);
}

#[test]
fn invalid_config_rejected_at_construction() {
    let err = Screener::new(
        MatchConfig::default().with_chunk_size(0),
        CompressionSimilarity::default(),
    )
    .unwrap_err();
    assert!(matches!(err, MatchError::InvalidConfig(_)));
}
