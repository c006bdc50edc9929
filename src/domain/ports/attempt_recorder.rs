use crate::domain::errors::TrackerResult;
use crate::domain::models::MisunderstandingRecord;

/// Sink for remediation check scores
///
/// Implemented by the misunderstanding tracker; remediation units only ever
/// talk to it through this trait.
pub trait AttemptRecorder {
    /// Record one scored remediation attempt for `misunderstanding_id`
    ///
    /// Returns the updated record, or `None` when the id is not tracked.
    fn record_attempt(
        &self,
        misunderstanding_id: &str,
        score: f64,
    ) -> TrackerResult<Option<MisunderstandingRecord>>;
}
