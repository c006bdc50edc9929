use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::{MisunderstandingRecord, PriorityConfig, RemediationStatus};

/// An active misunderstanding with its remediation priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrioritizedMisunderstanding {
    pub score: f64,
    #[serde(flatten)]
    pub record: MisunderstandingRecord,
}

/// Service for ranking misunderstandings by remediation urgency
///
/// Priority formula:
/// `severity * 10 + confidence * 5 + min(detections, 5) + recency_boost
///  + in_progress_boost - stalled_penalty`
#[derive(Debug, Clone)]
pub struct PriorityCalculator {
    weights: PriorityConfig,
}

impl Default for PriorityCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl PriorityCalculator {
    /// Create a new priority calculator with default weights
    pub fn new() -> Self {
        Self {
            weights: PriorityConfig::default(),
        }
    }

    /// Create a priority calculator with custom weights
    pub fn with_weights(weights: PriorityConfig) -> Self {
        Self { weights }
    }

    /// Calculate the priority of one record as of `now`
    pub fn calculate(&self, record: &MisunderstandingRecord, now: DateTime<Utc>) -> f64 {
        let w = &self.weights;
        let severity = f64::from(record.severity.level()) * w.severity_weight;
        let confidence = record.confidence * w.confidence_weight;
        let detections = f64::from(record.detection_count.min(w.detection_cap));

        severity + confidence + detections + self.recency_boost(record, now) + self.status_adjustment(record)
    }

    /// Boost for misunderstandings seen within the recent window
    fn recency_boost(&self, record: &MisunderstandingRecord, now: DateTime<Utc>) -> f64 {
        let days_since = (now - record.last_detected).num_days();
        if days_since < self.weights.recent_days {
            self.weights.recency_boost
        } else {
            0.0
        }
    }

    /// In-progress boost minus the penalty for remediation that keeps failing
    fn status_adjustment(&self, record: &MisunderstandingRecord) -> f64 {
        let w = &self.weights;
        let mut adjustment = 0.0;
        if record.remediation_status == RemediationStatus::InProgress {
            adjustment += w.in_progress_boost;
        }
        let stalled = record.remediation_attempts > w.stalled_attempts
            && record.last_attempt_score.is_some_and(|s| s < w.stalled_score);
        if stalled {
            adjustment -= w.stalled_penalty;
        }
        adjustment
    }

    /// Score and sort active records, highest first
    ///
    /// Ties keep the order of `records`.
    pub fn rank(
        &self,
        records: Vec<MisunderstandingRecord>,
        now: DateTime<Utc>,
    ) -> Vec<PrioritizedMisunderstanding> {
        let mut ranked: Vec<PrioritizedMisunderstanding> = records
            .into_iter()
            .filter(MisunderstandingRecord::is_active)
            .map(|record| PrioritizedMisunderstanding {
                score: self.calculate(&record, now),
                record,
            })
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{MisunderstandingCandidate, PatternCategory, PatternRule, Severity};
    use chrono::Duration;

    fn create_test_record(id: &str, severity: Severity, confidence: f64, now: DateTime<Utc>) -> MisunderstandingRecord {
        let rule = PatternRule::new(id, PatternCategory::Subtraction, severity, id, "d", "c", &[]);
        let candidate = MisunderstandingCandidate::from_rule(&rule, confidence, 2, vec![]);
        MisunderstandingRecord::from_candidate(&candidate, now)
    }

    #[test]
    fn test_calculate_fresh_record() {
        let now = Utc::now();
        let calc = PriorityCalculator::new();
        let record = create_test_record("sub_a", Severity::Major, 1.0, now);

        // 3 * 10 + 1.0 * 5 + 1 + 3
        assert!((calc.calculate(&record, now) - 39.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_detection_count_is_capped() {
        let now = Utc::now();
        let calc = PriorityCalculator::new();
        let mut record = create_test_record("sub_a", Severity::Minor, 0.0, now);
        record.detection_count = 40;

        // 10 + 0 + 5 + 3
        assert!((calc.calculate(&record, now) - 18.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_recency_boost_expires() {
        let now = Utc::now();
        let calc = PriorityCalculator::new();
        let record = create_test_record("sub_a", Severity::Minor, 0.0, now - Duration::days(8));

        assert!((calc.calculate(&record, now) - 11.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_in_progress_boost_and_stalled_penalty() {
        let now = Utc::now();
        let calc = PriorityCalculator::new();
        let mut record = create_test_record("sub_a", Severity::Minor, 0.0, now);
        record.remediation_status = RemediationStatus::InProgress;
        assert!((calc.calculate(&record, now) - 16.0).abs() < f64::EPSILON);

        record.remediation_attempts = 3;
        record.last_attempt_score = Some(0.2);
        assert!((calc.calculate(&record, now) - 11.0).abs() < f64::EPSILON);

        // two attempts are not yet stalled
        record.remediation_attempts = 2;
        assert!((calc.calculate(&record, now) - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_custom_weights() {
        let now = Utc::now();
        let calc = PriorityCalculator::with_weights(PriorityConfig {
            severity_weight: 1.0,
            recency_boost: 0.0,
            ..PriorityConfig::default()
        });
        let record = create_test_record("sub_a", Severity::Major, 0.5, now);

        // 3 + 2.5 + 1
        assert!((calc.calculate(&record, now) - 6.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rank_excludes_resolved_and_keeps_ties_stable() {
        let now = Utc::now();
        let calc = PriorityCalculator::new();
        let first = create_test_record("sub_first", Severity::Moderate, 0.5, now);
        let second = create_test_record("sub_second", Severity::Moderate, 0.5, now);
        let top = create_test_record("sub_top", Severity::Major, 0.5, now);
        let mut resolved = create_test_record("sub_done", Severity::Major, 1.0, now);
        resolved.remediation_status = RemediationStatus::Resolved;

        let ranked = calc.rank(vec![first, resolved, second, top], now);
        let ids: Vec<&str> = ranked.iter().map(|r| r.record.id.as_str()).collect();
        assert_eq!(ids, vec!["sub_top", "sub_first", "sub_second"]);
    }
}
