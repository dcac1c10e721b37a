use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Variable whose presence switches storage to the in-memory backend.
pub const DEFAULT_EPHEMERAL_SIGNAL_VAR: &str = "DATABASE_URL";
/// Variable overriding the data directory.
pub const DATA_DIR_VAR: &str = "DATA_DIR";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_signal_var")]
    pub ephemeral_signal_var: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: default_data_dir(), ephemeral_signal_var: default_signal_var() }
    }
}

fn default_data_dir() -> PathBuf { PathBuf::from("./data") }
fn default_signal_var() -> String { DEFAULT_EPHEMERAL_SIGNAL_VAR.to_string() }

/// Read `CONFIG_PATH` (default `config.toml`); a missing file yields defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = common::env::var_or("CONFIG_PATH", "config.toml");
    if std::fs::metadata(&path).is_err() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.storage.normalize_from_env();
        self.storage.validate()
    }
}

impl StorageConfig {
    /// `DATA_DIR` wins over the file value when set and non-empty.
    pub fn normalize_from_env(&mut self) {
        if let Some(dir) = common::env::var_non_empty(DATA_DIR_VAR) {
            self.data_dir = PathBuf::from(dir);
        }
        self.ephemeral_signal_var = self.ephemeral_signal_var.trim().to_string();
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(anyhow!("storage.data_dir must not be empty"));
        }
        if self.ephemeral_signal_var.is_empty() {
            return Err(anyhow!("storage.ephemeral_signal_var must name an environment variable"));
        }
        Ok(())
    }
}
