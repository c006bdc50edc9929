//! Wiring of configuration, storage and content for one CLI invocation.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::adapters::{JsonFileStore, LayeredContent};
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::services::{ErrorAnalyzer, MisunderstandingTracker};

pub struct CliContext {
    pub config: Config,
}

impl CliContext {
    /// Load configuration from `path`, or from the default locations.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => ConfigLoader::load_from_file(path),
            None => ConfigLoader::load(),
        }
        .context("Failed to load configuration")?;
        Ok(Self { config })
    }

    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Tracker backed by the JSON file store under `storage.path`.
    pub fn tracker(&self) -> MisunderstandingTracker {
        let store = JsonFileStore::new(&self.config.storage.path);
        MisunderstandingTracker::with_config(Arc::new(store), &self.config)
    }

    pub fn analyzer(&self) -> ErrorAnalyzer {
        ErrorAnalyzer::new(self.config.analysis.clone())
    }

    pub fn content(&self) -> LayeredContent {
        LayeredContent::from_config(&self.config.content)
    }
}
