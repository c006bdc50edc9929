//! Batch error analysis.
//!
//! Runs every detector of a [`PatternCatalog`] against every incorrect
//! attempt of a batch and turns the per-rule match tallies into
//! confidence-scored [`MisunderstandingCandidate`]s.

use std::cmp::Ordering;
use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::domain::models::{AnalysisConfig, AttemptRecord, ErrorExample, MisunderstandingCandidate};
use crate::domain::ports::Detector;
use crate::services::patterns::PatternCatalog;

/// Outcome of one analysis pass, with batch statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub total_attempts: usize,
    pub incorrect_attempts: usize,
    /// Detector evaluations that returned an error or panicked.
    pub detector_failures: usize,
    pub candidates: Vec<MisunderstandingCandidate>,
}

/// Per-rule evidence gathered during a pass.
#[derive(Default)]
struct Tally {
    matches: usize,
    examples: Vec<ErrorExample>,
}

pub struct ErrorAnalyzer {
    catalog: PatternCatalog,
    config: AnalysisConfig,
}

impl Default for ErrorAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl ErrorAnalyzer {
    /// Analyzer over the built-in catalog
    pub fn new(config: AnalysisConfig) -> Self {
        Self::with_catalog(PatternCatalog::builtin(), config)
    }

    pub fn with_catalog(catalog: PatternCatalog, config: AnalysisConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Candidates for a batch, most confident first.
    pub fn analyse(&self, attempts: &[AttemptRecord]) -> Vec<MisunderstandingCandidate> {
        self.analyse_report(attempts).candidates
    }

    #[instrument(skip_all, fields(attempts = attempts.len()))]
    pub fn analyse_report(&self, attempts: &[AttemptRecord]) -> AnalysisReport {
        let incorrect: Vec<&AttemptRecord> = attempts.iter().filter(|a| !a.correct).collect();
        let mut report = AnalysisReport {
            total_attempts: attempts.len(),
            incorrect_attempts: incorrect.len(),
            ..AnalysisReport::default()
        };
        if incorrect.is_empty() {
            info!("no incorrect attempts to analyse");
            return report;
        }

        #[allow(clippy::cast_precision_loss)]
        let total = incorrect.len() as f64;

        for detector in self.catalog.detectors() {
            let tally = self.tally(detector, &incorrect, &mut report.detector_failures);
            if tally.matches == 0 {
                continue;
            }
            #[allow(clippy::cast_precision_loss)]
            let confidence = (tally.matches as f64 / total).min(1.0);
            if tally.matches >= self.config.min_match_count || confidence >= self.config.min_confidence {
                report.candidates.push(MisunderstandingCandidate::from_rule(
                    detector.rule(),
                    confidence,
                    tally.matches,
                    tally.examples,
                ));
            }
        }

        report.candidates.sort_by(rank);

        info!(
            incorrect = report.incorrect_attempts,
            candidates = report.candidates.len(),
            failures = report.detector_failures,
            "analysed attempt batch"
        );
        report
    }

    fn tally(&self, detector: &dyn Detector, attempts: &[&AttemptRecord], failures: &mut usize) -> Tally {
        let mut tally = Tally::default();
        for &attempt in attempts {
            if evaluate(detector, attempt, failures) {
                tally.matches += 1;
                if tally.examples.len() < self.config.max_examples {
                    tally.examples.push(ErrorExample {
                        problem_text: attempt.problem_text(),
                        user_answer: attempt.user_answer,
                        correct_answer: attempt.correct_answer,
                    });
                }
            }
        }
        tally
    }
}

/// Run one detector on one attempt. Errors and panics count as no match.
fn evaluate(detector: &dyn Detector, attempt: &AttemptRecord, failures: &mut usize) -> bool {
    let rule_id = detector.rule().id.as_str();
    match panic::catch_unwind(AssertUnwindSafe(|| detector.detect(attempt))) {
        Ok(Ok(matched)) => matched,
        Ok(Err(err)) => {
            *failures += 1;
            debug!(rule = rule_id, problem = %attempt.problem_text(), error = %err, "detector could not evaluate attempt");
            false
        }
        Err(_) => {
            *failures += 1;
            debug!(rule = rule_id, problem = %attempt.problem_text(), "detector panicked");
            false
        }
    }
}

/// Confidence desc, then severity desc, then id asc.
fn rank(a: &MisunderstandingCandidate, b: &MisunderstandingCandidate) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| b.severity.cmp(&a.severity))
        .then_with(|| a.id.cmp(&b.id))
}
