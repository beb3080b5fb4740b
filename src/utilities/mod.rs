//! Cross-cutting utilities: error types, configuration loading and logging setup.

pub mod config;
pub mod errors;
pub mod logger;
