//! Misunderstanding domain model.
//!
//! Candidates are the analyzer's per-batch findings. Records are their
//! persisted, cross-session aggregate with a remediation lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::pattern::{PatternCategory, PatternRule, Severity};

/// Remediation lifecycle of a tracked misunderstanding.
///
/// Moves forward only: `identified -> in_progress -> resolved`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemediationStatus {
    /// Detected, no remediation attempted yet
    #[default]
    Identified,
    /// At least one remediation check has been taken
    InProgress,
    /// Remediation succeeded (or was marked resolved)
    Resolved,
}

impl RemediationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identified => "identified",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "identified" => Some(Self::Identified),
            "in_progress" | "inprogress" => Some(Self::InProgress),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Resolved)
    }

    /// Valid transitions from this status.
    pub fn valid_transitions(&self) -> Vec<RemediationStatus> {
        match self {
            Self::Identified => vec![Self::InProgress, Self::Resolved],
            Self::InProgress => vec![Self::Resolved],
            Self::Resolved => vec![],
        }
    }

    pub fn can_transition_to(&self, new_status: Self) -> bool {
        self.valid_transitions().contains(&new_status)
    }
}

impl fmt::Display for RemediationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One matched attempt kept as evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorExample {
    pub problem_text: String,
    pub user_answer: Option<i64>,
    pub correct_answer: Option<i64>,
}

impl fmt::Display for ErrorExample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<i64>| v.map_or_else(|| "?".to_string(), |n| n.to_string());
        write!(
            f,
            "{} = {} (answered {})",
            self.problem_text,
            show(self.correct_answer),
            show(self.user_answer)
        )
    }
}

/// A misunderstanding the analyzer found in one batch of attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MisunderstandingCandidate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub root_cause: String,
    pub category: PatternCategory,
    pub severity: Severity,
    pub prerequisites: BTreeSet<String>,
    /// Fraction of the batch's incorrect attempts this pattern explains.
    pub confidence: f64,
    pub match_count: usize,
    pub examples: Vec<ErrorExample>,
}

impl MisunderstandingCandidate {
    pub fn from_rule(
        rule: &PatternRule,
        confidence: f64,
        match_count: usize,
        examples: Vec<ErrorExample>,
    ) -> Self {
        Self {
            id: rule.id.clone(),
            name: rule.name.clone(),
            description: rule.description.clone(),
            root_cause: rule.root_cause.clone(),
            category: rule.category,
            severity: rule.severity,
            prerequisites: rule.prerequisites.clone(),
            confidence: confidence.clamp(0.0, 1.0),
            match_count,
            examples,
        }
    }
}

/// Persisted, cross-session record of a misunderstanding, keyed by rule id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MisunderstandingRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub root_cause: String,
    pub category: PatternCategory,
    pub severity: Severity,
    #[serde(default)]
    pub prerequisites: BTreeSet<String>,
    pub confidence: f64,
    pub match_count: usize,
    #[serde(default)]
    pub examples: Vec<ErrorExample>,
    pub detected_at: DateTime<Utc>,
    pub last_detected: DateTime<Utc>,
    pub detection_count: u32,
    #[serde(default)]
    pub remediation_status: RemediationStatus,
    #[serde(default)]
    pub remediation_attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_attempt_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_attempt_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl MisunderstandingRecord {
    /// Create a record from its first detection.
    pub fn from_candidate(candidate: &MisunderstandingCandidate, now: DateTime<Utc>) -> Self {
        Self {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            description: candidate.description.clone(),
            root_cause: candidate.root_cause.clone(),
            category: candidate.category,
            severity: candidate.severity,
            prerequisites: candidate.prerequisites.clone(),
            confidence: candidate.confidence.clamp(0.0, 1.0),
            match_count: candidate.match_count,
            examples: candidate.examples.clone(),
            detected_at: now,
            last_detected: now,
            detection_count: 1,
            remediation_status: RemediationStatus::Identified,
            remediation_attempts: 0,
            last_attempt_score: None,
            last_attempt_date: None,
            resolved_at: None,
        }
    }

    /// Fold a repeat detection into the record.
    ///
    /// Confidence never decreases; evidence is replaced with the newest batch.
    pub fn merge_detection(&mut self, candidate: &MisunderstandingCandidate, now: DateTime<Utc>) {
        self.last_detected = now;
        self.detection_count = self.detection_count.saturating_add(1);
        self.confidence = self.confidence.max(candidate.confidence.clamp(0.0, 1.0));
        self.match_count = candidate.match_count;
        self.examples = candidate.examples.clone();
    }

    /// Move to `status` if the lifecycle allows it. Returns whether anything changed.
    pub fn transition_to(&mut self, status: RemediationStatus, now: DateTime<Utc>) -> bool {
        if !self.remediation_status.can_transition_to(status) {
            return false;
        }
        self.remediation_status = status;
        if status == RemediationStatus::Resolved {
            self.resolved_at = Some(now);
        }
        true
    }

    pub fn is_active(&self) -> bool {
        self.remediation_status.is_active()
    }
}

/// Active/resolved partition of every tracked record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackedMisunderstandings {
    pub active: Vec<MisunderstandingRecord>,
    pub resolved: Vec<MisunderstandingRecord>,
}

/// Counts of tracked records by status and category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerSummary {
    pub total: usize,
    pub identified: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub by_category: Vec<(PatternCategory, usize)>,
}
