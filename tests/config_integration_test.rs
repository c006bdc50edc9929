use std::io::Write;

use fluency::cli::CliContext;
use fluency::ConfigLoader;
use tempfile::NamedTempFile;

fn config_file(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

#[test]
fn test_file_then_env_precedence() {
    let file = config_file(
        r"
storage:
  path: /tmp/fluency-from-file
analysis:
  min_match_count: 4
remediation:
  resolve_score: 0.9
",
    );

    temp_env::with_vars(
        [
            ("FLUENCY_ANALYSIS__MIN_MATCH_COUNT", Some("3")),
            ("FLUENCY_LOGGING__LEVEL", Some("debug")),
        ],
        || {
            let config = ConfigLoader::load_from_file(file.path()).unwrap();
            assert_eq!(config.storage.path, "/tmp/fluency-from-file");
            assert_eq!(config.analysis.min_match_count, 3);
            assert!((config.remediation.resolve_score - 0.9).abs() < f64::EPSILON);
            assert_eq!(config.logging.level, "debug");
            // untouched sections keep their defaults
            assert_eq!(config.analysis.max_examples, 3);
        },
    );
}

#[test]
fn test_invalid_file_values_are_rejected() {
    let file = config_file("analysis:\n  min_confidence: 1.5\n");
    let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("min_confidence"));
}

#[test]
fn test_cli_context_wires_configured_store() {
    let store_dir = tempfile::TempDir::new().unwrap();
    let file = config_file(&format!(
        "storage:\n  path: {}\n  key: learner-7\n",
        store_dir.path().display()
    ));

    let ctx = CliContext::load(Some(file.path())).unwrap();
    let tracker = ctx.tracker();
    assert_eq!(tracker.key(), "learner-7");
    assert!(tracker.get_active(None).unwrap().is_empty());
    assert_eq!(ctx.content().len(), 1);
}
