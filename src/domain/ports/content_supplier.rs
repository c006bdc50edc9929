use crate::domain::models::RemediationStep;

/// Source of authored remediation lessons
///
/// `None` means no lesson has been written for the misunderstanding yet.
/// That is a normal state: the misunderstanding stays trackable, it just
/// cannot be remediated through a lesson.
pub trait ContentSupplier: Send + Sync {
    fn remediation_content(&self, misunderstanding_id: &str) -> Option<Vec<RemediationStep>>;
}
