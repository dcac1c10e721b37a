//! Storage backends behind the gateway.
//!
//! Both backends speak the same [`KvBackend`] contract; the gateway picks one
//! per call based on the resolved [`crate::Mode`].

pub mod file;
pub mod memory;

use crate::errors::StorageError;
use crate::value::{LoadOutcome, StoredValue};

/// Suffix marking keys whose file content goes through format inference.
/// Also stripped from keys to form in-memory slot names.
pub const TEXT_SUFFIX: &str = ".txt";

/// Save/load contract shared by the file and memory backends.
/// Implementations must never fail on load; faults surface as `Absent`.
pub trait KvBackend: Send + Sync {
    fn save(&self, key: &str, value: &StoredValue) -> Result<(), StorageError>;
    fn load(&self, key: &str) -> LoadOutcome;
}

/// Every key, in either mode, must be non-empty.
pub fn require_non_empty(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::invalid_key(key, "is empty"));
    }
    Ok(())
}

/// File keys name one flat entry: non-empty, no path separators, not `.` or `..`.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    require_non_empty(key)?;
    if key == "." || key == ".." {
        return Err(StorageError::invalid_key(key, "is a directory reference"));
    }
    if key.contains(['/', '\\', '\0']) {
        return Err(StorageError::invalid_key(key, "must not contain path separators"));
    }
    Ok(())
}

/// In-memory slot for a key: the trailing [`TEXT_SUFFIX`] is dropped, so
/// `"x.txt"` and `"x"` share a slot.
pub fn slot_name(key: &str) -> &str {
    key.strip_suffix(TEXT_SUFFIX).unwrap_or(key)
}
