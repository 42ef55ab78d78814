mod common;

use agehist::aggregator::{AtomicAggregator, ShardedAggregator};
use agehist::config::{Mode, PipelineConfig};
use agehist::source::SourceErrorKind;
use agehist::{Histogram, Input, run, run_queue, run_tasks};
use common::{reference_histogram, tag_classifier, tagged_lines};
use std::fs;

const MODES: [Mode; 2] = [Mode::Queue, Mode::Tasks];

fn config(mode: Mode, workers: usize) -> PipelineConfig {
    PipelineConfig::detect()
        .with_mode(mode)
        .with_workers(workers)
        .with_queue_capacity(256)
}

#[test]
fn test_concrete_scenario_both_modes() {
    let lines = ["A:0", "A:5", "A:130", "A:5", "INVALID", "A:-1", "A:999"];
    let expected: Histogram = [(0, 1), (5, 2), (130, 1)].into_iter().collect();

    for mode in MODES {
        let summary = run(Input::from_lines(&lines), &tag_classifier, &config(mode, 4)).unwrap();
        assert_eq!(summary.histogram, expected, "mode {:?}", mode);
        assert_eq!(summary.histogram.total(), 4);
        assert_eq!(summary.stats.counted, 4);
        assert_eq!(summary.stats.rejected, 3);
        assert_eq!(summary.stats.lines_read, 7);
        assert!(summary.source_error.is_none());
    }
}

#[test]
fn test_total_matches_line_count_for_any_thread_count() {
    let lines = tagged_lines(20_000);
    for mode in MODES {
        for workers in [1, 2, 8, 64] {
            let summary =
                run(Input::from_lines(&lines), &tag_classifier, &config(mode, workers)).unwrap();
            assert_eq!(
                summary.histogram.total(),
                20_000,
                "mode {:?} with {} workers",
                mode,
                workers
            );
        }
    }
}

#[test]
fn test_histogram_is_independent_of_thread_count_and_mode() {
    let lines = tagged_lines(10_000);
    let reference = reference_histogram(&lines);

    for mode in MODES {
        for workers in [1, 3, 16] {
            let summary =
                run(Input::from_lines(&lines), &tag_classifier, &config(mode, workers)).unwrap();
            assert_eq!(summary.histogram, reference, "mode {:?} with {} workers", mode, workers);
        }
    }
}

#[test]
fn test_every_item_released_exactly_once() {
    let mut lines = tagged_lines(5_000);
    lines.extend(["", "garbage", "A:-3"].iter().map(|s| s.to_string()));

    for mode in MODES {
        let summary = run(Input::from_lines(&lines), &tag_classifier, &config(mode, 8)).unwrap();
        assert_eq!(summary.items_issued, lines.len() as u64);
        assert_eq!(summary.items_released, lines.len() as u64);
        assert_eq!(summary.stats.processed(), lines.len() as u64);
        assert_eq!(summary.stats.blank, 1);
    }
}

#[test]
fn test_malformed_lines_do_not_disturb_other_counts() {
    let good = tagged_lines(3_000);
    let mut mixed = Vec::new();
    for (i, line) in good.iter().enumerate() {
        mixed.push(line.clone());
        match i % 5 {
            0 => mixed.push("A:".to_string()),
            1 => mixed.push("A:1e9".to_string()),
            2 => mixed.push("A:131".to_string()),
            3 => mixed.push(String::new()),
            _ => mixed.push("A:5 trailing".to_string()),
        }
    }

    for mode in MODES {
        let summary = run(Input::from_lines(&mixed), &tag_classifier, &config(mode, 8)).unwrap();
        assert_eq!(summary.histogram, reference_histogram(&good));
        assert_eq!(summary.stats.counted, 3_000);
    }
}

#[test]
fn test_either_variant_with_either_aggregator() {
    let lines = tagged_lines(4_000);
    let reference = reference_histogram(&lines);
    let cfg = config(Mode::Queue, 6);

    let input = Input::from_lines(&lines);
    let queue_atomic = run_queue(input, &tag_classifier, AtomicAggregator::new(), &cfg).unwrap();
    let input = Input::from_lines(&lines);
    let tasks_sharded = run_tasks(input, &tag_classifier, ShardedAggregator::new(), &cfg).unwrap();

    assert_eq!(queue_atomic.histogram, reference);
    assert_eq!(tasks_sharded.histogram, reference);
}

#[test]
fn test_empty_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    fs::write(&path, "").unwrap();

    for mode in MODES {
        let summary = run(Input::path(&path), &tag_classifier, &config(mode, 4)).unwrap();
        assert!(summary.histogram.is_empty());
        assert!(summary.source_error.is_none());
        assert_eq!(summary.items_issued, 0);
    }
}

#[test]
fn test_missing_file_yields_empty_histogram() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.txt");

    for mode in MODES {
        let summary = run(Input::path(&path), &tag_classifier, &config(mode, 4)).unwrap();
        assert!(summary.histogram.is_empty());
        let err = summary.source_error.expect("open failure is reported");
        assert_eq!(err.kind, SourceErrorKind::Open);
        assert!(err.to_string().starts_with("No se pudo abrir el archivo"));
    }
}

#[test]
fn test_file_with_crlf_and_invalid_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mixed.txt");
    fs::write(&path, b"A:1\r\nA:2\n\xff\xfeA:3\n\r\nA:2").unwrap();

    for mode in MODES {
        let summary = run(Input::path(&path), &tag_classifier, &config(mode, 2)).unwrap();
        let expected: Histogram = [(1, 1), (2, 2)].into_iter().collect();
        assert_eq!(summary.histogram, expected);
        assert_eq!(summary.stats.lines_read, 5);
        assert_eq!(summary.stats.blank, 1);
        assert_eq!(summary.stats.rejected, 1);
    }
}
