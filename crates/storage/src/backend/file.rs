use std::{fs, io, path::{Path, PathBuf}};

use tracing::{debug, warn};

use super::{validate_key, KvBackend, TEXT_SUFFIX};
use crate::errors::StorageError;
use crate::value::{LoadOutcome, StoredValue};

/// Flat file backend: one file per key directly under `base_dir`.
///
/// Writes truncate and replace the whole file. There is no locking and no
/// atomic rename, so a concurrent reader may see a partial write.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self { base_dir: base_dir.into() }
    }

    pub fn base_dir(&self) -> &Path { &self.base_dir }

    /// Ensure the base directory exists and return the file path for `key`.
    pub fn resolve_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        fs::create_dir_all(&self.base_dir).map_err(|source| StorageError::DirectoryCreationFailed {
            path: self.base_dir.clone(),
            source,
        })?;
        Ok(self.base_dir.join(key))
    }
}

impl KvBackend for FileStore {
    fn save(&self, key: &str, value: &StoredValue) -> Result<(), StorageError> {
        let path = self.resolve_path(key)?;
        let data = value.encode()?;
        fs::write(&path, data).map_err(|source| StorageError::WriteFailed { path: path.clone(), source })?;
        debug!(key, path = %path.display(), structured = value.is_structured(), "file save");
        Ok(())
    }

    fn load(&self, key: &str) -> LoadOutcome {
        let path = match self.resolve_path(key) {
            Ok(p) => p,
            Err(e) => {
                warn!(key, error = %e, "file load skipped");
                return LoadOutcome::Absent;
            }
        };
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return LoadOutcome::Absent,
            Err(e) => {
                warn!(key, path = %path.display(), error = %e, "file load failed; reporting absent");
                return LoadOutcome::Absent;
            }
        };
        // Inference is gated on the suffix: other keys get their raw text back.
        if key.ends_with(TEXT_SUFFIX) {
            LoadOutcome::Found(StoredValue::infer(&raw))
        } else {
            LoadOutcome::Found(StoredValue::Opaque(raw))
        }
    }
}
