//! Domain layer for the verdict evaluation system
//!
//! This module contains core models and business errors, free of I/O.

pub mod error;
pub mod models;

// Re-export error types for convenient access
pub use error::{DomainError, EvalError, StoreError};
