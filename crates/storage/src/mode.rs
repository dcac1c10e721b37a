//! Deployment mode resolution.
//!
//! The mode is derived, never stored: with [`ModeSource::Environment`] the signal
//! variable is re-read on every resolution.

use std::fmt;

use serde::Serialize;

/// Backend selector for a single operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// No durable local disk; values live in the process-local map.
    Ephemeral,
    /// Writable local filesystem; one file per key under the data directory.
    Persistent,
}

impl Mode {
    /// Any non-empty signal value selects `Ephemeral`.
    pub fn from_signal(signal: Option<&str>) -> Self {
        match signal {
            Some(v) if !v.is_empty() => Mode::Ephemeral,
            _ => Mode::Persistent,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Ephemeral => "ephemeral",
            Mode::Persistent => "persistent",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Where the mode comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeSource {
    /// Inspect `signal_var` in the process environment on each call.
    Environment { signal_var: String },
    /// Pinned mode, for hosts whose signal is stable for the process lifetime.
    Fixed(Mode),
}

impl ModeSource {
    pub fn environment<S: Into<String>>(signal_var: S) -> Self {
        Self::Environment { signal_var: signal_var.into() }
    }

    pub fn resolve(&self) -> Mode {
        match self {
            ModeSource::Environment { signal_var } => {
                Mode::from_signal(common::env::var_non_empty(signal_var).as_deref())
            }
            ModeSource::Fixed(mode) => *mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_presence_selects_mode() {
        assert_eq!(Mode::from_signal(None), Mode::Persistent);
        assert_eq!(Mode::from_signal(Some("")), Mode::Persistent);
        assert_eq!(Mode::from_signal(Some("postgres://db")), Mode::Ephemeral);
        assert_eq!(Mode::from_signal(Some("0")), Mode::Ephemeral);
    }

    #[test]
    fn fixed_source_ignores_environment() {
        assert_eq!(ModeSource::Fixed(Mode::Ephemeral).resolve(), Mode::Ephemeral);
        assert_eq!(ModeSource::Fixed(Mode::Persistent).resolve(), Mode::Persistent);
    }

    #[test]
    fn unset_variable_resolves_persistent() {
        let var = format!("DUALSTORE_TEST_UNSET_{}", std::process::id());
        assert_eq!(ModeSource::environment(var).resolve(), Mode::Persistent);
    }

    #[test]
    fn mode_displays_lowercase() {
        assert_eq!(Mode::Ephemeral.to_string(), "ephemeral");
        assert_eq!(serde_json::to_string(&Mode::Persistent).unwrap(), "\"persistent\"");
    }
}
