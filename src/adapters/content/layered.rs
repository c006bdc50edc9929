use crate::domain::models::{ContentConfig, RemediationStep};
use crate::domain::ports::ContentSupplier;

use super::{BuiltinContent, YamlContentDirectory};

/// Ordered stack of suppliers; the first one with a lesson wins.
#[derive(Default)]
pub struct LayeredContent {
    layers: Vec<Box<dyn ContentSupplier>>,
}

impl LayeredContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a lower-precedence layer.
    #[must_use]
    pub fn with(mut self, supplier: impl ContentSupplier + 'static) -> Self {
        self.layers.push(Box::new(supplier));
        self
    }

    /// Configured YAML directory (if any) over the built-in lessons.
    pub fn from_config(config: &ContentConfig) -> Self {
        let layered = Self::new();
        let layered = match &config.directory {
            Some(dir) => layered.with(YamlContentDirectory::new(dir)),
            None => layered,
        };
        layered.with(BuiltinContent::new())
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl ContentSupplier for LayeredContent {
    fn remediation_content(&self, misunderstanding_id: &str) -> Option<Vec<RemediationStep>> {
        self.layers
            .iter()
            .find_map(|layer| layer.remediation_content(misunderstanding_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl ContentSupplier for Fixed {
        fn remediation_content(&self, _id: &str) -> Option<Vec<RemediationStep>> {
            Some(vec![RemediationStep::Explain {
                text: self.0.to_string(),
            }])
        }
    }

    #[test]
    fn test_first_layer_wins() {
        let content = LayeredContent::new().with(Fixed("override")).with(BuiltinContent::new());
        let steps = content.remediation_content("add_no_carry").unwrap();
        assert_eq!(
            steps,
            vec![RemediationStep::Explain {
                text: "override".to_string()
            }]
        );
    }

    #[test]
    fn test_falls_through_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let content = LayeredContent::from_config(&ContentConfig {
            directory: Some(dir.path().display().to_string()),
        });
        assert_eq!(content.len(), 2);
        assert!(content.remediation_content("add_no_carry").is_some());
        assert!(content.remediation_content("add_off_by_one").is_none());
    }
}
