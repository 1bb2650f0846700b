//! Persistence for derived meaningful-test maps.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;

use crate::domain::models::report::MeaningfulMap;
use crate::domain::StoreError;

/// Union shape across sources: instance ID to source to meaningful tests.
pub type MeaningfulUnion = BTreeMap<String, MeaningfulMap>;

/// One counted file in a meaningful-tests directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeaningfulCount {
    pub file: String,
    /// Top-level instance count, or `None` when the file failed to parse.
    pub instances: Option<usize>,
}

/// Reads and writes `meaningful_<source>.json` files plus their union.
pub struct MeaningfulStore {
    dir: PathBuf,
}

impl MeaningfulStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes the per-source map as pretty JSON, creating the directory.
    pub fn save(&self, source: &str, meaningful: &MeaningfulMap) -> Result<PathBuf, StoreError> {
        let path = self.dir.join(format!("meaningful_{source}.json"));
        self.write_json(&path, meaningful)?;
        Ok(path)
    }

    /// Writes the cross-source union map as pretty JSON.
    pub fn save_union(&self, union: &MeaningfulUnion) -> Result<PathBuf, StoreError> {
        let path = self.dir.join("meaningful_union.json");
        self.write_json(&path, union)?;
        Ok(path)
    }

    /// Counts top-level instances in every `*.json` file, sorted by name.
    ///
    /// A file that fails to parse still appears in the listing, with its
    /// count absent.
    pub fn count_files(&self) -> Result<Vec<MeaningfulCount>, StoreError> {
        if !self.dir.is_dir() {
            return Err(StoreError::NotADirectory(self.dir.clone()));
        }

        let mut paths: Vec<PathBuf> = Vec::new();
        let entries = fs::read_dir(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut counts = Vec::new();
        for path in &paths {
            let Some(filename) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let instances = fs::read_to_string(path)
                .ok()
                .and_then(|text| {
                    serde_json::from_str::<BTreeMap<String, serde_json::Value>>(&text).ok()
                })
                .map(|entries| entries.len());
            if instances.is_none() {
                warn!("Could not count instances in {}", path.display());
            }
            counts.push(MeaningfulCount {
                file: filename.to_string(),
                instances,
            });
        }
        Ok(counts)
    }

    fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Write {
            path: self.dir.clone(),
            source,
        })?;
        let text = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, text).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
