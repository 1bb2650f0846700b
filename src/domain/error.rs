use std::path::PathBuf;

use thiserror::Error;

use super::models::report::BaselineKind;

/// Domain-level errors for evaluation operations
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Group '{source}' is missing its {role} baseline")]
    MissingBaseline { r#source: String, role: BaselineKind },

    #[error("Group '{source}' has no agent runs")]
    NoAgentRuns { r#source: String },

    #[error("Group '{source}' has no meaningful tests (gold and none baselines agree everywhere)")]
    NoMeaningfulTests { r#source: String },

    #[error("Group '{source}' not found in results directory")]
    GroupNotFound { r#source: String },
}

/// Errors raised by the file-backed stores
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("No result files found under {0}")]
    EmptyResultsDir(PathBuf),

    #[error("No instance ids found in catalogue {0}")]
    EmptyCatalog(PathBuf),

    #[error("Catalogue files share no instance ids")]
    EmptyCatalogIntersection,
}

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Evaluation error: {0}")]
    Eval(#[from] EvalError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
