//! Infrastructure layer module
//!
//! This module contains everything that touches the filesystem or process
//! environment:
//! - Result, solution, score, and catalogue stores
//! - Selection and meaningful-test output writers
//! - Configuration management

pub mod config;
pub mod store;
