//! Lessons authored as YAML files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::domain::models::RemediationStep;
use crate::domain::ports::ContentSupplier;

/// A directory of `<misunderstanding-id>.yaml` files, each a list of steps.
///
/// Files are read on every lookup so edits show up without a restart.
#[derive(Debug, Clone)]
pub struct YamlContentDirectory {
    dir: PathBuf,
}

impl YamlContentDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn lesson_path(&self, id: &str) -> Option<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        valid.then(|| self.dir.join(format!("{id}.yaml")))
    }
}

impl ContentSupplier for YamlContentDirectory {
    fn remediation_content(&self, misunderstanding_id: &str) -> Option<Vec<RemediationStep>> {
        let path = self.lesson_path(misunderstanding_id)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot read lesson file");
                return None;
            }
        };
        match serde_yaml::from_str::<Vec<RemediationStep>>(&text) {
            Ok(steps) if steps.is_empty() => None,
            Ok(steps) => Some(steps),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring malformed lesson file");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::StepKind;

    const LESSON: &str = r#"
- type: explain
  text: Ones go under ones.
- type: check
  passingScore: 0.5
  problems:
    - problem: "12 + 30"
      answer: { kind: exact, expected: "42" }
"#;

    #[test]
    fn test_reads_lesson_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("add_off_by_ten.yaml"), LESSON).unwrap();

        let content = YamlContentDirectory::new(dir.path());
        let steps = content.remediation_content("add_off_by_ten").unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].kind(), StepKind::Check);
    }

    #[test]
    fn test_missing_and_malformed_files_are_none() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.yaml"), "- type: dance\n").unwrap();

        let content = YamlContentDirectory::new(dir.path());
        assert!(content.remediation_content("absent").is_none());
        assert!(content.remediation_content("broken").is_none());
    }

    #[test]
    fn test_path_like_ids_are_rejected() {
        let content = YamlContentDirectory::new("/tmp");
        assert!(content.remediation_content("../etc/passwd").is_none());
    }
}
