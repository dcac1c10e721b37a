use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use configs::StorageConfig;

use crate::backend::{file::FileStore, memory::MemoryStore, require_non_empty, validate_key, KvBackend};
use crate::errors::StorageError;
use crate::mode::{Mode, ModeSource};
use crate::value::{LoadOutcome, StoredValue};

/// Uniform save/load over the file and memory backends.
///
/// The mode is resolved on every call, so a gateway built with
/// [`ModeSource::Environment`] follows the signal variable. The memory backend
/// is injected so its lifetime (and sharing) is the caller's choice.
pub struct PersistenceGateway {
    mode: ModeSource,
    files: FileStore,
    memory: MemoryStore,
}

impl PersistenceGateway {
    /// Gateway driven by the configured signal variable and data directory.
    pub fn new(config: &StorageConfig, memory: MemoryStore) -> Self {
        Self::with_mode(ModeSource::environment(config.ephemeral_signal_var.clone()), &config.data_dir, memory)
    }

    pub fn with_mode<P: Into<PathBuf>>(mode: ModeSource, base_dir: P, memory: MemoryStore) -> Self {
        Self { mode, files: FileStore::new(base_dir), memory }
    }

    pub fn mode(&self) -> Mode { self.mode.resolve() }

    pub fn files(&self) -> &FileStore { &self.files }

    pub fn memory(&self) -> &MemoryStore { &self.memory }

    fn backend(&self, mode: Mode) -> &dyn KvBackend {
        match mode {
            Mode::Ephemeral => &self.memory,
            Mode::Persistent => &self.files,
        }
    }

    /// Store `value` under `key`, replacing whatever was there.
    ///
    /// Ephemeral saves only require a non-empty key; the flat-file rules
    /// apply to the file backend alone.
    pub fn save<V: Into<StoredValue>>(&self, key: &str, value: V) -> Result<(), StorageError> {
        let mode = self.mode();
        match mode {
            Mode::Ephemeral => require_non_empty(key)?,
            Mode::Persistent => validate_key(key)?,
        }
        debug!(key, %mode, "save");
        self.backend(mode).save(key, &value.into())
    }

    /// Serialize `value` and store it; containers become structured, scalars opaque.
    pub fn save_as<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        self.save(key, StoredValue::from_serialize(value)?)
    }

    /// Fetch the value under `key`. Never fails: faults are logged and reported as absent.
    pub fn load(&self, key: &str) -> LoadOutcome {
        let mode = self.mode();
        let outcome = self.backend(mode).load(key);
        debug!(key, %mode, found = !outcome.is_absent(), "load");
        outcome
    }

    pub fn load_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.load(key).decode()
    }

    /// Physical location for `key`.
    ///
    /// Persistent mode creates the data directory as a side effect. In
    /// ephemeral mode nothing touches disk and the path points into the
    /// system temp directory.
    pub fn resolve_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        match self.mode() {
            Mode::Persistent => self.files.resolve_path(key),
            Mode::Ephemeral => {
                validate_key(key)?;
                Ok(std::env::temp_dir().join(key))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TempDir;
    use serde_json::json;

    fn gateway(mode: Mode, tmp: &TempDir) -> PersistenceGateway {
        PersistenceGateway::with_mode(ModeSource::Fixed(mode), tmp.path().join("data"), MemoryStore::new())
    }

    #[test]
    fn ephemeral_mode_never_touches_disk() -> Result<(), anyhow::Error> {
        let tmp = TempDir::new("gw_ephemeral");
        let gw = gateway(Mode::Ephemeral, &tmp);

        gw.save("chain.txt", json!([{"index": 0}]))?;
        assert_eq!(gw.load("chain"), LoadOutcome::Found(json!([{"index": 0}]).into()));
        assert!(!tmp.path().join("data").exists());

        let path = gw.resolve_path("chain.txt")?;
        assert_eq!(path, std::env::temp_dir().join("chain.txt"));
        assert!(!tmp.path().join("data").exists());
        Ok(())
    }

    #[test]
    fn ephemeral_keeps_scalar_as_given() -> Result<(), anyhow::Error> {
        let tmp = TempDir::new("gw_scalar");
        let gw = gateway(Mode::Ephemeral, &tmp);
        gw.save("count.txt", 42u32)?;
        assert_eq!(gw.load("count.txt"), LoadOutcome::Found(StoredValue::Opaque("42".into())));
        assert_eq!(gw.load_as::<u32>("count"), Some(42));
        Ok(())
    }

    #[test]
    fn typed_helpers_round_trip_structs() -> Result<(), anyhow::Error> {
        #[derive(Serialize, serde::Deserialize, PartialEq, Debug)]
        struct Node { id: String, peers: Vec<String> }

        let tmp = TempDir::new("gw_typed");
        let gw = gateway(Mode::Persistent, &tmp);
        let node = Node { id: "n1".into(), peers: vec!["n2".into()] };
        gw.save_as("node.txt", &node)?;
        assert_eq!(gw.load_as::<Node>("node.txt"), Some(node));
        assert_eq!(gw.load_as::<Node>("other.txt"), None);
        Ok(())
    }

    #[test]
    fn ephemeral_save_accepts_any_non_empty_key() -> Result<(), anyhow::Error> {
        let tmp = TempDir::new("gw_nested_key");
        let gw = gateway(Mode::Ephemeral, &tmp);

        gw.save("peers/node.txt", json!([1]))?;
        assert_eq!(gw.load("peers/node"), LoadOutcome::Found(json!([1]).into()));
        gw.save("..", "dots")?;
        assert_eq!(gw.load(".."), LoadOutcome::Found("dots".into()));

        // the same key is still refused by the file backend
        let files = gateway(Mode::Persistent, &tmp);
        assert!(matches!(files.save("peers/node.txt", json!([1])), Err(StorageError::InvalidKey(_))));
        Ok(())
    }

    #[test]
    fn environment_signal_is_read_on_every_call() -> Result<(), anyhow::Error> {
        let tmp = TempDir::new("gw_env");
        let var = format!("DUALSTORE_TEST_SIGNAL_FLIP_{}", std::process::id());
        let gw = PersistenceGateway::with_mode(
            ModeSource::environment(var.clone()),
            tmp.path().join("data"),
            MemoryStore::new(),
        );
        assert_eq!(gw.mode(), Mode::Persistent);

        std::env::set_var(&var, "postgres://db");
        assert_eq!(gw.mode(), Mode::Ephemeral);
        gw.save("chain.txt", json!([0]))?;
        assert!(gw.memory().contains("chain"));
        assert!(!tmp.path().join("data").exists());

        std::env::remove_var(&var);
        assert_eq!(gw.mode(), Mode::Persistent);
        assert!(gw.load("chain.txt").is_absent());
        gw.save("chain.txt", json!([1]))?;
        assert!(tmp.path().join("data").join("chain.txt").is_file());
        assert_eq!(gw.memory().len(), 1);
        Ok(())
    }

    #[test]
    fn empty_key_is_rejected_in_both_modes() {
        let tmp = TempDir::new("gw_empty");
        for mode in [Mode::Ephemeral, Mode::Persistent] {
            let gw = gateway(mode, &tmp);
            assert!(matches!(gw.save("", "v"), Err(StorageError::InvalidKey(_))));
            assert!(gw.load("").is_absent());
        }
    }

    #[test]
    fn config_builds_environment_driven_gateway() {
        let config = StorageConfig {
            data_dir: PathBuf::from("./somewhere"),
            ephemeral_signal_var: format!("DUALSTORE_TEST_SIGNAL_{}", std::process::id()),
        };
        let gw = PersistenceGateway::new(&config, MemoryStore::new());
        assert_eq!(gw.mode(), Mode::Persistent);
        assert_eq!(gw.files().base_dir(), config.data_dir.as_path());
    }
}
