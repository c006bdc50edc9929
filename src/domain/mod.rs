//! Domain layer for Fluency
//!
//! This module contains the attempt, pattern, misunderstanding and lesson
//! models plus the ports adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DetectionError, RemediationError, StoreError, TrackerError, TrackerResult};
