mod common;

use common::{file_tracker, memory_tracker, sub};
use fluency::{ErrorAnalyzer, RemediationStatus};
use tempfile::TempDir;

#[test]
fn test_records_survive_a_new_tracker_instance() {
    let dir = TempDir::new().unwrap();
    let candidates = ErrorAnalyzer::default().analyse(&[sub(53, 28, 35), sub(42, 17, 35)]);

    file_tracker(dir.path()).track_candidates(&candidates).unwrap();

    let reopened = file_tracker(dir.path());
    let record = reopened.get("sub_smaller_from_larger").unwrap().unwrap();
    assert_eq!(record.detection_count, 1);
    assert_eq!(record.remediation_status, RemediationStatus::Identified);
    assert!(dir.path().join("fluency.misunderstandings.json").exists());
}

#[test]
fn test_repeat_detection_accumulates() {
    let dir = TempDir::new().unwrap();
    let tracker = file_tracker(dir.path());
    let analyzer = ErrorAnalyzer::default();

    let weak = analyzer.analyse(&[sub(53, 28, 35), sub(61, 34, 28)]);
    tracker.track_candidates(&weak).unwrap();
    let first = tracker.get("sub_smaller_from_larger").unwrap().unwrap();

    let strong = analyzer.analyse(&[sub(53, 28, 35), sub(42, 17, 35)]);
    tracker.track_candidates(&strong).unwrap();
    let second = tracker.get("sub_smaller_from_larger").unwrap().unwrap();

    assert_eq!(second.detection_count, 2);
    assert!((first.confidence - 0.5).abs() < f64::EPSILON);
    assert!(second.confidence > first.confidence);
    assert_eq!(second.detected_at, first.detected_at);
}

#[test]
fn test_two_good_checks_resolve() {
    let tracker = memory_tracker();
    let candidates = ErrorAnalyzer::default().analyse(&[sub(53, 28, 35), sub(42, 17, 35)]);
    tracker.track_candidates(&candidates).unwrap();

    let once = tracker.record_attempt("sub_smaller_from_larger", 0.9).unwrap().unwrap();
    assert_eq!(once.remediation_status, RemediationStatus::InProgress);
    assert!(once.resolved_at.is_none());

    let twice = tracker.record_attempt("sub_smaller_from_larger", 0.9).unwrap().unwrap();
    assert_eq!(twice.remediation_status, RemediationStatus::Resolved);
    assert!(twice.resolved_at.is_some());

    let ranked = tracker.remediation_priority().unwrap();
    assert!(ranked.iter().all(|p| p.record.id != "sub_smaller_from_larger"));

    let all = tracker.get_all().unwrap();
    assert!(all.resolved.iter().any(|r| r.id == "sub_smaller_from_larger"));
}

#[test]
fn test_corrupt_store_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("fluency.misunderstandings.json"), "{ not json").unwrap();
    let tracker = file_tracker(dir.path());
    assert!(tracker.get_active(None).is_err());
}
