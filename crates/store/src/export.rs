//! Text-file export rooted at a directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// File-backed export target for the planogram record.
///
/// Writes replace any existing file of the same name (delete-then-write),
/// so readers only ever see a complete old or new record.
#[derive(Debug, Clone)]
pub struct ExportStore {
    dir: PathBuf,
}

impl ExportStore {
    /// Create an export store rooted at `dir`, creating the directory.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).context("Failed to create export directory")?;
        Ok(Self { dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Write `content`, replacing any existing file of the same name.
    pub fn write(&self, name: &str, content: &str) -> Result<()> {
        let path = self.file_path(name);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove stale export {}", path.display()))?;
        }
        fs::write(&path, content)
            .with_context(|| format!("Failed to write export {}", path.display()))?;
        Ok(())
    }

    /// Read a previously written export.
    pub fn read(&self, name: &str) -> Result<String> {
        let path = self.file_path(name);
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read export {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_store(tag: &str) -> ExportStore {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = env::temp_dir().join(format!("shelfmark_export_{tag}_{timestamp}"));
        ExportStore::new(dir).expect("Failed to create store")
    }

    #[test]
    fn write_then_read_roundtrips() {
        let store = temp_store("roundtrip");
        store.write("record.json", "{\"ok\":true}").unwrap();
        assert_eq!(store.read("record.json").unwrap(), "{\"ok\":true}");
    }

    #[test]
    fn write_replaces_existing_content() {
        let store = temp_store("replace");
        store.write("record.json", "old").unwrap();
        store.write("record.json", "new").unwrap();
        assert_eq!(store.read("record.json").unwrap(), "new");
    }

    #[test]
    fn read_missing_file_is_an_error() {
        let store = temp_store("missing");
        assert!(store.read("nope.json").is_err());
    }
}
