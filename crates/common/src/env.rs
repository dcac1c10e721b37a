//! Environment helpers
//!
//! Presence checks treat an empty value the same as an unset variable.

use tracing::trace;

/// Value of `name` if it is set, valid unicode, and non-empty.
pub fn var_non_empty(name: &str) -> Option<String> {
    let value = std::env::var(name).ok().filter(|v| !v.is_empty());
    trace!(var = name, present = value.is_some(), "env lookup");
    value
}

/// Value of `name`, or `default` when unset or empty.
pub fn var_or(name: &str, default: &str) -> String {
    var_non_empty(name).unwrap_or_else(|| default.to_string())
}
