//! Infrastructure layer module
//!
//! Configuration loading and logging setup. Storage and content adapters
//! live in [`crate::adapters`].

pub mod config;
pub mod logging;
