//! Directory-backed key-value store.
//!
//! Each key is one pretty-printed JSON file, `<dir>/<sanitized-key>.json`.
//! Writes go to a sibling temporary file which is then renamed over the
//! target, so a crash mid-write leaves the previous document intact.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::domain::errors::StoreError;
use crate::domain::ports::KeyValueStore;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

/// Map a key onto a safe file stem: ASCII alphanumerics, `.`, `-` and `_`
/// are kept, everything else becomes `_`.
fn sanitize_key(key: &str) -> String {
    let stem: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    // keep ".." and friends from naming a directory
    if stem.trim_matches('.').is_empty() {
        format!("_{stem}")
    } else {
        stem
    }
}

fn io_error(key: &str, source: io::Error) -> StoreError {
    StoreError::Io {
        key: key.to_string(),
        source,
    }
}

/// Write `body` to `tmp`, flush it, and rename it over `path`.
fn replace_file(tmp: &Path, path: &Path, body: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(tmp)?;
    file.write_all(body)?;
    file.sync_all()?;
    drop(file);
    fs::rename(tmp, path)
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(io_error(key, err)),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            })
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(key, e))?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        let body = serde_json::to_vec_pretty(&value).map_err(|source| StoreError::Corrupt {
            key: key.to_string(),
            source,
        })?;
        if let Err(err) = replace_file(&tmp, &path, &body) {
            // best effort; the write error is the one worth reporting
            let _ = fs::remove_file(&tmp);
            return Err(io_error(key, err));
        }

        debug!(key, path = %path.display(), bytes = body.len(), "stored document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("fluency.misunderstandings"), "fluency.misunderstandings");
        assert_eq!(sanitize_key("a/b c"), "a_b_c");
        assert_eq!(sanitize_key(".."), "_..");
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("store"));
        assert!(store.get("fluency.misunderstandings").unwrap().is_none());
    }

    #[test]
    fn test_roundtrip_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/store"));
        store.set("k", json!([{"id": "add_no_carry"}])).unwrap();

        assert!(store.path_for("k").exists());
        assert!(!store.path_for("k").with_extension("json.tmp").exists());
        assert_eq!(store.get("k").unwrap(), Some(json!([{"id": "add_no_carry"}])));
    }

    #[test]
    fn test_failed_write_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        // a non-empty directory where the document should go makes the rename fail
        let target = store.path_for("k");
        fs::create_dir_all(target.join("occupied")).unwrap();

        let err = store.set("k", json!({"id": "add_no_carry"})).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(!target.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        fs::write(store.path_for("k"), "{not json").unwrap();
        assert!(matches!(store.get("k"), Err(StoreError::Corrupt { .. })));
    }
}
