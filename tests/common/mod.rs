//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use fluency::{AttemptRecord, InMemoryStore, JsonFileStore, MisunderstandingTracker, Problem};

pub fn sub(a: i64, b: i64, answer: i64) -> AttemptRecord {
    AttemptRecord::answered(Problem::subtraction(a, b), answer)
}

pub fn add(a: i64, b: i64, answer: i64) -> AttemptRecord {
    AttemptRecord::answered(Problem::addition(a, b), answer)
}

pub fn memory_tracker() -> MisunderstandingTracker {
    MisunderstandingTracker::new(Arc::new(InMemoryStore::new()))
}

pub fn file_tracker(dir: &std::path::Path) -> MisunderstandingTracker {
    MisunderstandingTracker::new(Arc::new(JsonFileStore::new(dir)))
}

/// Answers that take the built-in `sub_smaller_from_larger` lesson up to its check.
pub const SUB_SMALLER_FROM_LARGER_TO_CHECK: &[&str] =
    &["yes", "13", "5", "4", "2", "25", "25", "27", "44"];
