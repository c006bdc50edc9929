// Installs the global subscriber, so this file holds a single test.

use std::fs;

use fluency::infrastructure::logging::{LogConfig, LogFormat, LoggerImpl, RotationPolicy};
use fluency::{ErrorAnalyzer, AttemptRecord, Problem};
use tempfile::TempDir;

#[test]
fn test_service_events_reach_the_json_log_file() {
    let dir = TempDir::new().unwrap();
    let config = LogConfig {
        level: "info".to_string(),
        format: LogFormat::Json,
        log_dir: Some(dir.path().to_path_buf()),
        enable_console: false,
        rotation: RotationPolicy::Never,
    };
    let logger = LoggerImpl::init(&config).unwrap();

    let attempts = vec![
        AttemptRecord::answered(Problem::subtraction(53, 28), 35),
        AttemptRecord::answered(Problem::subtraction(42, 17), 35),
    ];
    ErrorAnalyzer::default().analyse(&attempts);

    // dropping the guard flushes the background writer
    drop(logger);

    let contents = fs::read_to_string(dir.path().join("fluency.log")).unwrap();
    let events: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert!(events
        .iter()
        .any(|e| e["fields"]["message"] == "logger initialized"));
    assert!(events
        .iter()
        .any(|e| e["fields"]["message"] == "analysed attempt batch" && e["fields"]["candidates"].as_u64() > Some(0)));
}
