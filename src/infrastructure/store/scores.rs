//! External score table: a flat JSON map from agent name to benchmark score.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Loads the external score table used for stage-two tie-breaking.
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Loads the table, or an empty one when the file is missing or invalid.
    ///
    /// Selection treats absent agents as score 0.0, so a missing table only
    /// weakens tie-breaking; it never stops a run.
    pub fn load(&self) -> BTreeMap<String, f64> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) => {
                warn!("Score table not found: {}: {}", self.path.display(), err);
                return BTreeMap::new();
            }
        };
        match serde_json::from_str::<BTreeMap<String, f64>>(&text) {
            Ok(scores) => {
                debug!(
                    "Loaded {} scores from {}",
                    scores.len(),
                    self.path.display()
                );
                scores
            }
            Err(err) => {
                warn!("Malformed score table {}: {}", self.path.display(), err);
                BTreeMap::new()
            }
        }
    }
}
