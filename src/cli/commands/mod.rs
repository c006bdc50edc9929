//! CLI command implementations.

pub mod analyze;
pub mod misunderstanding;
pub mod patterns;
pub mod remediate;

use crate::domain::models::{PatternCategory, RemediationStatus};

pub(crate) fn parse_category(s: &str) -> Result<PatternCategory, String> {
    PatternCategory::from_str(s).ok_or_else(|| {
        format!("unknown category '{s}' (expected addition, subtraction or large_numbers)")
    })
}

pub(crate) fn parse_status(s: &str) -> Result<RemediationStatus, String> {
    RemediationStatus::from_str(s).ok_or_else(|| {
        format!("unknown status '{s}' (expected identified, in_progress or resolved)")
    })
}
