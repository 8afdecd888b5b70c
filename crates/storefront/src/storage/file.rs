//! File-backed storage.
//!
//! All keys live in one JSON object file (`storage.json`) inside the
//! configured directory. Every read goes to disk, so two stores pointed at
//! the same directory observe each other's writes on their next read.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{DEFAULT_QUOTA_BYTES, PersistentStore, StorageError};

const STORAGE_FILE: &str = "storage.json";

/// A `PersistentStore` backed by a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    quota: usize,
}

impl FileStore {
    /// Open a store rooted at `dir` with the default quota.
    ///
    /// The directory is created lazily on first write.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_quota(dir, DEFAULT_QUOTA_BYTES)
    }

    /// Open a store rooted at `dir` limited to `quota` bytes on disk.
    #[must_use]
    pub fn with_quota(dir: impl AsRef<Path>, quota: usize) -> Self {
        Self {
            path: dir.as_ref().join(STORAGE_FILE),
            quota,
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let contents = serde_json::to_string(entries)?;
        if contents.len() > self.quota {
            return Err(StorageError::QuotaExceeded {
                limit: self.quota,
                attempted: contents.len(),
            });
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write-then-rename so a crash never leaves a truncated file behind
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents.as_bytes())?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        debug!(path = %self.path.display(), bytes = contents.len(), "Storage file written");
        Ok(())
    }
}

impl PersistentStore for FileStore {
    type Error = StorageError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let mut entries = self.read_entries()?;
        Ok(entries.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(StorageError::Corrupt(e)) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Replacing corrupt storage file"
                );
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };

        entries.insert(key.to_owned(), value.to_owned());
        self.write_entries(&entries)
    }
}
