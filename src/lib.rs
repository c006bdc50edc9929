//! Fluency - arithmetic misunderstanding diagnostics
//!
//! Fluency looks at a learner's incorrect addition and subtraction answers,
//! matches them against a catalog of known misunderstandings, keeps a
//! persistent record of what it found, and walks the learner through
//! remediation lessons whose check scores feed back into that record.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and port traits
//! - **Service Layer** (`services`): pattern catalog, analyzer, tracker,
//!   priority ranking and the remediation state machine
//! - **Adapters** (`adapters`): key-value stores and lesson content suppliers
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use fluency::{AttemptRecord, ErrorAnalyzer, InMemoryStore, MisunderstandingTracker, Problem};
//!
//! let attempts = vec![
//!     AttemptRecord::answered(Problem::subtraction(53, 28), 35),
//!     AttemptRecord::answered(Problem::subtraction(42, 17), 35),
//! ];
//! let candidates = ErrorAnalyzer::default().analyse(&attempts);
//! assert!(candidates.iter().any(|c| c.id == "sub_smaller_from_larger"));
//!
//! let tracker = MisunderstandingTracker::new(Arc::new(InMemoryStore::new()));
//! tracker.track_candidates(&candidates).unwrap();
//! assert!(!tracker.remediation_priority().unwrap().is_empty());
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::{BuiltinContent, InMemoryStore, JsonFileStore, LayeredContent, YamlContentDirectory};
pub use domain::errors::{DetectionError, RemediationError, StoreError, TrackerError, TrackerResult};
pub use domain::models::{
    AnswerSpec, AttemptRecord, Config, MisunderstandingCandidate, MisunderstandingRecord,
    Operation, PatternCategory, PatternRule, Problem, RemediationStatus, RemediationStep, Severity,
};
pub use domain::ports::{AttemptRecorder, ContentSupplier, Detector, KeyValueStore};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{
    validate_answer, validate_partition, AnalysisReport, ErrorAnalyzer, MisunderstandingTracker,
    PatternCatalog, PriorityCalculator, RemediationUnit,
};
