pub mod attempt;
pub mod config;
pub mod misunderstanding;
pub mod pattern;
pub mod remediation;

pub use attempt::{AttemptRecord, Operation, Problem};
pub use config::{
    AnalysisConfig, Config, ContentConfig, LoggingConfig, PriorityConfig, RemediationConfig,
    StorageConfig,
};
pub use misunderstanding::{
    ErrorExample, MisunderstandingCandidate, MisunderstandingRecord, RemediationStatus,
    TrackedMisunderstandings, TrackerSummary,
};
pub use pattern::{PatternCategory, PatternRule, Severity};
pub use remediation::{
    AnswerSpec, GuidedProblem, PracticeProblem, RemediationProgress, RemediationStep, StepKind,
    SubStep,
};
