//! `fluency analyze`: run the analyzer over a practice session.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::cli::context::CliContext;
use crate::cli::display::{
    action_success, colorize_severity, list_table, output, percent, truncate, CommandOutput,
};
use crate::domain::models::AttemptRecord;
use crate::services::{AnalysisReport, ErrorAnalyzer, MisunderstandingTracker};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// JSON file holding an array of attempts
    pub file: PathBuf,

    /// Report candidates without tracking them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeOutput {
    #[serde(flatten)]
    pub report: AnalysisReport,
    pub dry_run: bool,
    /// Ids written to the tracker (empty on a dry run).
    pub tracked: Vec<String>,
}

impl CommandOutput for AnalyzeOutput {
    fn to_human(&self) -> String {
        let r = &self.report;
        let mut lines = vec![format!(
            "Analyzed {} attempts ({} incorrect).",
            r.total_attempts, r.incorrect_attempts
        )];
        if r.detector_failures > 0 {
            lines.push(format!("{} detector evaluations failed and were skipped.", r.detector_failures));
        }
        if r.candidates.is_empty() {
            lines.push("No misunderstandings detected.".to_string());
            return lines.join("\n");
        }

        let mut table = list_table(&["id", "confidence", "matches", "severity", "example"]);
        for c in &r.candidates {
            let example = c.examples.first().map(ToString::to_string).unwrap_or_default();
            table.add_row(vec![
                c.id.clone(),
                percent(c.confidence),
                c.match_count.to_string(),
                colorize_severity(c.severity).to_string(),
                truncate(&example, 40),
            ]);
        }
        lines.push(table.to_string());

        if self.dry_run {
            lines.push("Dry run: nothing was tracked.".to_string());
        } else {
            lines.push(action_success(&format!(
                "Tracked {} misunderstanding(s).",
                self.tracked.len()
            )));
        }
        lines.join("\n")
    }
}

/// Read a JSON array of attempts.
///
/// Elements that are not attempt objects at all are skipped with a warning;
/// the rest of the batch is still analysed.
pub fn read_attempts(path: &Path) -> Result<Vec<AttemptRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read attempts from {}", path.display()))?;
    let elements: Vec<Value> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of attempts", path.display()))?;

    let mut attempts = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value(element) {
            Ok(attempt) => attempts.push(attempt),
            Err(err) => warn!(index, error = %err, "skipping unreadable attempt"),
        }
    }
    Ok(attempts)
}

pub fn analyze(
    analyzer: &ErrorAnalyzer,
    tracker: &MisunderstandingTracker,
    attempts: &[AttemptRecord],
    dry_run: bool,
) -> Result<AnalyzeOutput> {
    let report = analyzer.analyse_report(attempts);
    let tracked = if dry_run {
        Vec::new()
    } else {
        tracker
            .track_candidates(&report.candidates)
            .context("Failed to track detected misunderstandings")?
            .into_iter()
            .map(|record| record.id)
            .collect()
    };
    Ok(AnalyzeOutput {
        report,
        dry_run,
        tracked,
    })
}

pub fn execute(args: AnalyzeArgs, ctx: &CliContext, json: bool) -> Result<()> {
    let attempts = read_attempts(&args.file)?;
    let result = analyze(&ctx.analyzer(), &ctx.tracker(), &attempts, args.dry_run)?;
    output(&result, json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryStore;
    use std::io::Write;
    use std::sync::Arc;

    const SESSION: &str = r#"[
        {"problem": {"a": 53, "b": 28, "operation": "subtraction"}, "userAnswer": 35, "correctAnswer": 25, "correct": false},
        {"problem": {"a": 42, "b": 17, "operation": "subtraction"}, "userAnswer": "35", "correctAnswer": 25, "correct": false},
        {"problem": {"a": 12, "b": 5, "operation": "addition"}, "userAnswer": 17, "correctAnswer": 17, "correct": true}
    ]"#;

    #[test]
    fn test_read_attempts() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SESSION.as_bytes()).unwrap();
        let attempts = read_attempts(file.path()).unwrap();
        assert_eq!(attempts.len(), 3);
        assert_eq!(attempts[1].user_answer, Some(35));
    }

    #[test]
    fn test_read_attempts_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"not\": \"an array\"}").unwrap();
        let err = read_attempts(file.path()).unwrap_err();
        assert!(err.to_string().contains("not a JSON array"));
    }

    #[test]
    fn test_malformed_attempts_do_not_sink_the_batch() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"[
                {"problem": {"a": 53, "b": 28, "operation": "-"}, "userAnswer": 35, "correctAnswer": 25, "correct": false},
                {"problem": {"a": "seven", "b": 2, "operation": "-"}, "userAnswer": 9, "correctAnswer": 5, "correct": false},
                {"problem": {"a": 61, "operation": "-"}, "userAnswer": 40, "correctAnswer": 27, "correct": false},
                {"problem": "53 - 28", "userAnswer": 35},
                42,
                {"problem": {"a": 42, "b": 17, "operation": "-"}, "userAnswer": 35, "correctAnswer": 25, "correct": false}
            ]"#,
        )
        .unwrap();

        let attempts = read_attempts(file.path()).unwrap();
        assert_eq!(attempts.len(), 4);
        assert_eq!(attempts[1].problem.a, None);
        assert_eq!(attempts[2].problem.b, None);

        let tracker = MisunderstandingTracker::new(Arc::new(InMemoryStore::new()));
        let result = analyze(&ErrorAnalyzer::default(), &tracker, &attempts, true).unwrap();
        let candidate = result
            .report
            .candidates
            .iter()
            .find(|c| c.id == "sub_smaller_from_larger")
            .expect("well-formed attempts are still analysed");
        assert_eq!(candidate.match_count, 2);
    }

    #[test]
    fn test_dry_run_tracks_nothing() {
        let attempts: Vec<AttemptRecord> = serde_json::from_str(SESSION).unwrap();
        let tracker = MisunderstandingTracker::new(Arc::new(InMemoryStore::new()));
        let analyzer = ErrorAnalyzer::default();

        let dry = analyze(&analyzer, &tracker, &attempts, true).unwrap();
        assert!(!dry.report.candidates.is_empty());
        assert!(dry.tracked.is_empty());
        assert!(tracker.get_all().unwrap().active.is_empty());

        let real = analyze(&analyzer, &tracker, &attempts, false).unwrap();
        assert!(real.tracked.contains(&"sub_smaller_from_larger".to_string()));
        assert!(tracker.get("sub_smaller_from_larger").unwrap().is_some());
    }
}
