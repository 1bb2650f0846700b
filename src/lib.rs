//! Verdict - Benchmark evaluation and per-instance agent selection
//!
//! Verdict scores coding-benchmark agents against generated test suites,
//! derives the meaningful tests that separate a real fix from no fix at all,
//! and picks the strongest solution per instance across a fleet of agents.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure models and business errors
//! - **Service Layer** (`services`): Derivation, scoring, and selection logic
//! - **Infrastructure Layer** (`infrastructure`): Configuration and file stores
//! - **CLI Layer** (`cli`): Clap commands and terminal output
//!
//! # Example
//!
//! ```no_run
//! use verdict::infrastructure::store::ResultsStore;
//! use verdict::services::{CoverageIndex, MeaningfulDeriver};
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = ResultsStore::new("results");
//!     for group in store.load_groups()? {
//!         let (gold, none) = group.require_baselines()?;
//!         let meaningful = MeaningfulDeriver::derive(gold, none);
//!         let index = CoverageIndex::build(&group, &meaningful);
//!         for (agent, _) in index.iter() {
//!             println!("{agent}: {} meaningful tests", index.agent_total(agent));
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    EvalGroup, MeaningfulMap, RunRecord, SelectionRecord, TieStatus, VerdictConfig,
};
pub use domain::{DomainError, EvalError, StoreError};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{CoverageIndex, MeaningfulDeriver, OracleAnalyzer, SelectionEngine};
