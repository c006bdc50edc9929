pub mod answer_validation;
pub mod error_analyzer;
pub mod misunderstanding_tracker;
pub mod patterns;
pub mod priority_calculator;
pub mod remediation_unit;

pub use answer_validation::{validate_answer, validate_partition};
pub use error_analyzer::{AnalysisReport, ErrorAnalyzer};
pub use misunderstanding_tracker::{MisunderstandingTracker, DEFAULT_STORE_KEY};
pub use patterns::{PatternCatalog, RuleDetector};
pub use priority_calculator::{PrioritizedMisunderstanding, PriorityCalculator};
pub use remediation_unit::{AnswerFeedback, CheckOutcome, PracticeResult, Prompt, RemediationUnit};
