//! Configuration utilities.

/// Server configuration (TOML file plus environment).
pub mod config;
