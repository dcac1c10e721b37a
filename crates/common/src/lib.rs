//! Shared runtime helpers: environment access and logging setup.

pub mod env;
pub mod utils;
