//! Real leaderboard results: `results_<agent>.json` files holding the set of
//! instances an agent actually resolved on the benchmark.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::StoreError;
use crate::services::matching::AgentMatcher;

#[derive(Debug, Default, Deserialize)]
struct RealResultsFile {
    #[serde(default)]
    resolved: Vec<String>,
}

/// One file copied during scraped-results curation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CuratedCopy {
    /// Agent name as it appeared in the scraped filename.
    pub scraped: String,
    /// Local agent it was matched to.
    pub agent: String,
    pub written: PathBuf,
}

/// Looks up benchmark-resolved instance sets by agent name.
///
/// The exact filename `results_<agent>.json` is tried first; failing that,
/// the first filename (in sorted order) containing the agent name is used.
/// Agents with no matching file have no entry at all.
pub struct RealResultsStore {
    results_dir: PathBuf,
}

impl RealResultsStore {
    pub fn new<P: AsRef<Path>>(results_dir: P) -> Self {
        Self {
            results_dir: results_dir.as_ref().to_path_buf(),
        }
    }

    /// The resolved-instance set for one agent, if a results file matches.
    pub fn resolved_for(&self, agent: &str) -> Option<BTreeSet<String>> {
        let exact = self.results_dir.join(format!("results_{agent}.json"));
        if exact.is_file() {
            return Some(self.read_resolved(&exact));
        }

        let mut candidates: Vec<PathBuf> = fs::read_dir(&self.results_dir)
            .ok()?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension().is_some_and(|ext| ext == "json")
                    && path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| name.contains(agent))
            })
            .collect();
        candidates.sort();

        let path = candidates.first()?;
        debug!(
            "Using fuzzy results match for '{}': {}",
            agent,
            path.display()
        );
        Some(self.read_resolved(path))
    }

    /// Resolved sets for every agent that has a results file.
    pub fn resolved_for_all(&self, agents: &[String]) -> BTreeMap<String, BTreeSet<String>> {
        let mut resolved = BTreeMap::new();
        for agent in agents {
            match self.resolved_for(agent) {
                Some(set) => {
                    resolved.insert(agent.clone(), set);
                }
                None => {
                    warn!("No real results file for agent '{agent}', skipping");
                }
            }
        }
        resolved
    }

    /// Curates a scraped leaderboard directory into this store's directory.
    ///
    /// Each `results_<name>.json` whose name fuzzily matches a local agent
    /// is copied here as `results_<LocalAgent>.json`. When several scraped
    /// files map to the same agent, later copies get `_1`, `_2`, ... suffixes.
    pub fn curate_scraped(
        &self,
        scraped_dir: &Path,
        matcher: &AgentMatcher,
    ) -> Result<Vec<CuratedCopy>, StoreError> {
        if !scraped_dir.is_dir() {
            return Err(StoreError::NotADirectory(scraped_dir.to_path_buf()));
        }
        fs::create_dir_all(&self.results_dir).map_err(|source| StoreError::Write {
            path: self.results_dir.clone(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = Vec::new();
        let entries = fs::read_dir(scraped_dir).map_err(|source| StoreError::Io {
            path: scraped_dir.to_path_buf(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: scraped_dir.to_path_buf(),
                source,
            })?;
            paths.push(entry.path());
        }
        paths.sort();

        let mut copies = Vec::new();
        for path in &paths {
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let Some(scraped_name) = stem.strip_prefix("results_") else {
                continue;
            };
            let Some(agent) = matcher.match_for(scraped_name) else {
                debug!("No local agent matches scraped results '{scraped_name}'");
                continue;
            };

            // Double underscores would collide with the agent/source filename split.
            let safe_name = agent.replace("__", "_");
            let target = self.collision_free_path(&safe_name);
            fs::copy(path, &target).map_err(|source| StoreError::Write {
                path: target.clone(),
                source,
            })?;
            copies.push(CuratedCopy {
                scraped: scraped_name.to_string(),
                agent: agent.to_string(),
                written: target,
            });
        }
        Ok(copies)
    }

    fn collision_free_path(&self, safe_name: &str) -> PathBuf {
        let base = self.results_dir.join(format!("results_{safe_name}.json"));
        if !base.exists() {
            return base;
        }
        let mut counter = 1;
        loop {
            let candidate = self
                .results_dir
                .join(format!("results_{safe_name}_{counter}.json"));
            if !candidate.exists() {
                return candidate;
            }
            counter += 1;
        }
    }

    fn read_resolved(&self, path: &Path) -> BTreeSet<String> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warn!("Failed to read {}: {}", path.display(), err);
                return BTreeSet::new();
            }
        };
        match serde_json::from_str::<RealResultsFile>(&text) {
            Ok(file) => file.resolved.into_iter().collect(),
            Err(err) => {
                warn!("Malformed results file {}: {}", path.display(), err);
                BTreeSet::new()
            }
        }
    }
}
