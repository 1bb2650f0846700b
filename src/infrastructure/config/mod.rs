//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment: built-in defaults, then
//! `.verdict/config.yaml`, then `.verdict/local.yaml`, then `VERDICT_*`
//! environment variables, with validation on the merged result.

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
