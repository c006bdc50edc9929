//! Domain errors for the Fluency diagnostics engine.

use thiserror::Error;

use super::models::StepKind;

/// Why a detector could not evaluate an attempt.
///
/// The analyzer counts every variant as "no match".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectionError {
    #[error("Attempt is missing {0}")]
    MissingField(&'static str),

    #[error("Arithmetic overflow while evaluating {0}")]
    Overflow(&'static str),

    #[error("Negative operand where digits were expected: {0}")]
    NegativeOperand(i64),
}

/// Key-value store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Stored value for key '{key}' is not valid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Tracker failures; only storage and (de)serialization can fail.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Misuse of the remediation state machine.
#[derive(Debug, Error)]
pub enum RemediationError {
    #[error("Remediation unit is already complete")]
    Complete,

    #[error("Current step is {actual}, which cannot be {action}")]
    WrongStep {
        actual: &'static str,
        action: &'static str,
    },

    #[error("Failed to record check score: {0}")]
    Recording(#[from] TrackerError),
}

impl RemediationError {
    pub(crate) fn wrong_step(kind: StepKind, action: &'static str) -> Self {
        Self::WrongStep {
            actual: kind.as_str(),
            action,
        }
    }
}
