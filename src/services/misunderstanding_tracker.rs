//! Persistent, cross-session misunderstanding tracking.
//!
//! The whole collection lives as one JSON array under one store key, in
//! first-detection order. Every operation loads it, mutates it and saves it
//! back; nothing is cached between calls.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::TrackerResult;
use crate::domain::models::{
    Config, MisunderstandingCandidate, MisunderstandingRecord, PatternCategory, RemediationConfig,
    RemediationStatus, TrackedMisunderstandings, TrackerSummary,
};
use crate::domain::ports::{AttemptRecorder, KeyValueStore};
use crate::services::priority_calculator::{PrioritizedMisunderstanding, PriorityCalculator};

pub const DEFAULT_STORE_KEY: &str = "fluency.misunderstandings";

pub struct MisunderstandingTracker {
    store: Arc<dyn KeyValueStore>,
    key: String,
    remediation: RemediationConfig,
    priority: PriorityCalculator,
}

impl MisunderstandingTracker {
    /// Tracker with default thresholds and weights under the default key.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: DEFAULT_STORE_KEY.to_string(),
            remediation: RemediationConfig::default(),
            priority: PriorityCalculator::new(),
        }
    }

    pub fn with_config(store: Arc<dyn KeyValueStore>, config: &Config) -> Self {
        Self {
            store,
            key: config.storage.key.clone(),
            remediation: config.remediation.clone(),
            priority: PriorityCalculator::with_weights(config.priority.clone()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn load(&self) -> TrackerResult<Vec<MisunderstandingRecord>> {
        match self.store.get(&self.key)? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, records: &[MisunderstandingRecord]) -> TrackerResult<()> {
        self.store.set(&self.key, serde_json::to_value(records)?)?;
        Ok(())
    }

    /// Insert a new record or fold the detection into the existing one.
    pub fn track_candidate(
        &self,
        candidate: &MisunderstandingCandidate,
    ) -> TrackerResult<MisunderstandingRecord> {
        let mut records = self.load()?;
        let record = upsert(&mut records, candidate, Utc::now());
        self.save(&records)?;
        Ok(record)
    }

    /// Track a whole analysis batch with a single load and save.
    #[instrument(skip_all, fields(candidates = candidates.len()))]
    pub fn track_candidates(
        &self,
        candidates: &[MisunderstandingCandidate],
    ) -> TrackerResult<Vec<MisunderstandingRecord>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let mut records = self.load()?;
        let now = Utc::now();
        let tracked = candidates
            .iter()
            .map(|candidate| upsert(&mut records, candidate, now))
            .collect();
        self.save(&records)?;
        Ok(tracked)
    }

    pub fn get(&self, id: &str) -> TrackerResult<Option<MisunderstandingRecord>> {
        Ok(self.load()?.into_iter().find(|r| r.id == id))
    }

    /// Records not yet resolved, optionally limited to one category.
    pub fn get_active(
        &self,
        category: Option<PatternCategory>,
    ) -> TrackerResult<Vec<MisunderstandingRecord>> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|r| r.is_active() && (category.is_none() || category == Some(r.category)))
            .collect())
    }

    pub fn get_all(&self) -> TrackerResult<TrackedMisunderstandings> {
        let (active, resolved) = self.load()?.into_iter().partition(MisunderstandingRecord::is_active);
        Ok(TrackedMisunderstandings { active, resolved })
    }

    /// Move a record forward in its lifecycle.
    ///
    /// Backward moves are ignored and the unchanged record is returned;
    /// `None` means the id is not tracked.
    pub fn update_status(
        &self,
        id: &str,
        status: RemediationStatus,
    ) -> TrackerResult<Option<MisunderstandingRecord>> {
        let mut records = self.load()?;
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            debug!(id, "status update for untracked misunderstanding");
            return Ok(None);
        };
        if record.remediation_status == status {
            return Ok(Some(record.clone()));
        }
        if !record.transition_to(status, Utc::now()) {
            warn!(
                id,
                from = %record.remediation_status,
                to = %status,
                "ignoring backward status change"
            );
            return Ok(Some(record.clone()));
        }
        let updated = record.clone();
        self.save(&records)?;
        info!(id, status = %status, "misunderstanding status updated");
        Ok(Some(updated))
    }

    /// Record one scored remediation check.
    ///
    /// A score at or above the resolve threshold resolves the record once the
    /// cumulative attempt count reaches the minimum; otherwise an identified
    /// record moves to in progress. Scores are clamped to `[0, 1]`.
    pub fn record_attempt(&self, id: &str, score: f64) -> TrackerResult<Option<MisunderstandingRecord>> {
        let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) };
        let mut records = self.load()?;
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            debug!(id, "attempt recorded for untracked misunderstanding");
            return Ok(None);
        };

        let now = Utc::now();
        record.remediation_attempts = record.remediation_attempts.saturating_add(1);
        record.last_attempt_score = Some(score);
        record.last_attempt_date = Some(now);

        let qualifies = score >= self.remediation.resolve_score
            && record.remediation_attempts >= self.remediation.min_attempts_to_resolve;
        if qualifies {
            if record.transition_to(RemediationStatus::Resolved, now) {
                info!(id, score, attempts = record.remediation_attempts, "misunderstanding resolved");
            }
        } else if record.remediation_status == RemediationStatus::Identified {
            record.transition_to(RemediationStatus::InProgress, now);
        }

        let updated = record.clone();
        self.save(&records)?;
        Ok(Some(updated))
    }

    /// Delete a record outright. Returns whether it existed.
    pub fn dismiss(&self, id: &str) -> TrackerResult<bool> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records)?;
        info!(id, "misunderstanding dismissed");
        Ok(true)
    }

    /// Active records ranked by remediation priority, highest first.
    pub fn remediation_priority(&self) -> TrackerResult<Vec<PrioritizedMisunderstanding>> {
        self.remediation_priority_at(Utc::now())
    }

    pub fn remediation_priority_at(
        &self,
        now: DateTime<Utc>,
    ) -> TrackerResult<Vec<PrioritizedMisunderstanding>> {
        Ok(self.priority.rank(self.load()?, now))
    }

    pub fn summary(&self) -> TrackerResult<TrackerSummary> {
        let records = self.load()?;
        let count = |status: RemediationStatus| {
            records
                .iter()
                .filter(|r| r.remediation_status == status)
                .count()
        };
        let by_category = PatternCategory::ALL
            .iter()
            .map(|&c| (c, records.iter().filter(|r| r.category == c).count()))
            .collect();
        Ok(TrackerSummary {
            total: records.len(),
            identified: count(RemediationStatus::Identified),
            in_progress: count(RemediationStatus::InProgress),
            resolved: count(RemediationStatus::Resolved),
            by_category,
        })
    }
}

impl AttemptRecorder for MisunderstandingTracker {
    fn record_attempt(&self, misunderstanding_id: &str, score: f64) -> TrackerResult<Option<MisunderstandingRecord>> {
        MisunderstandingTracker::record_attempt(self, misunderstanding_id, score)
    }
}

fn upsert(
    records: &mut Vec<MisunderstandingRecord>,
    candidate: &MisunderstandingCandidate,
    now: DateTime<Utc>,
) -> MisunderstandingRecord {
    if let Some(existing) = records.iter_mut().find(|r| r.id == candidate.id) {
        existing.merge_detection(candidate, now);
        debug!(id = %candidate.id, detections = existing.detection_count, "misunderstanding re-detected");
        return existing.clone();
    }
    let record = MisunderstandingRecord::from_candidate(candidate, now);
    info!(id = %candidate.id, confidence = candidate.confidence, "new misunderstanding identified");
    records.push(record.clone());
    record
}
