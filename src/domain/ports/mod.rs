//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces adapters and services implement:
//! - Detector: one misunderstanding predicate over a single attempt
//! - KeyValueStore: persisted JSON collections
//! - ContentSupplier: authored remediation lessons
//! - AttemptRecorder: where remediation check scores are reported
//!
//! These traits keep the diagnostic engine independent of storage,
//! content authoring and UI concerns.

pub mod attempt_recorder;
pub mod content_supplier;
pub mod detector;
pub mod key_value_store;

pub use attempt_recorder::AttemptRecorder;
pub use content_supplier::ContentSupplier;
pub use detector::Detector;
pub use key_value_store::KeyValueStore;
