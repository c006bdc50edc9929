use crate::domain::errors::DetectionError;
use crate::domain::models::{AttemptRecord, PatternRule};

/// A single catalogued misunderstanding: metadata plus a pure predicate.
///
/// Implementations must never read history; everything they know comes from
/// the one attempt passed in. Returning an error (or panicking) is treated by
/// the analyzer as "no match" for this rule only.
pub trait Detector: Send + Sync {
    /// Metadata describing the misunderstanding this detector recognizes
    fn rule(&self) -> &PatternRule;

    /// Whether `attempt` shows this misunderstanding
    ///
    /// # Errors
    /// Returns a [`DetectionError`] when the attempt lacks the data this
    /// detector needs or the arithmetic overflows.
    fn detect(&self, attempt: &AttemptRecord) -> Result<bool, DetectionError>;
}
