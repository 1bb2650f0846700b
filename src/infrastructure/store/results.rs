//! Result-file store: scans a directory of harness output files and turns
//! them into typed run records and evaluation groups.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::models::group::{assemble_groups, baseline_pairs, BaselinePair, EvalGroup};
use crate::domain::models::report::{RawInstanceReport, ResultRole, RunRecord, TestReport};
use crate::domain::StoreError;

/// Loads `*.json` result files from a directory.
///
/// Filenames carry the record role (`gold_<src>`, `none_<src>`,
/// `<agent>__<src>`); files with unrecognized names are skipped.
pub struct ResultsStore {
    results_dir: PathBuf,
}

impl ResultsStore {
    pub fn new<P: AsRef<Path>>(results_dir: P) -> Self {
        Self {
            results_dir: results_dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.results_dir
    }

    /// Loads every recognized result file, sorted by filename.
    ///
    /// Malformed instance records inside a file are dropped with a warning;
    /// the rest of the file still loads. A file that is not JSON at all is a
    /// hard error, as is a directory with no recognized files.
    pub fn load_runs(&self) -> Result<Vec<RunRecord>, StoreError> {
        if !self.results_dir.is_dir() {
            return Err(StoreError::NotADirectory(self.results_dir.clone()));
        }

        let mut paths: Vec<PathBuf> = Vec::new();
        let entries = fs::read_dir(&self.results_dir).map_err(|source| StoreError::Io {
            path: self.results_dir.clone(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.results_dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut runs = Vec::new();
        for path in &paths {
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let Some(role) = ResultRole::from_file_stem(stem) else {
                debug!("Skipping unrecognized result file: {}", path.display());
                continue;
            };
            let reports = load_report_file(path)?;
            runs.push(RunRecord::new(role, reports));
        }

        if runs.is_empty() {
            return Err(StoreError::EmptyResultsDir(self.results_dir.clone()));
        }
        debug!(
            "Loaded {} result files from {}",
            runs.len(),
            self.results_dir.display()
        );
        Ok(runs)
    }

    /// Loads and groups every run by its test-generation source.
    pub fn load_groups(&self) -> Result<Vec<EvalGroup>, StoreError> {
        Ok(assemble_groups(self.load_runs()?))
    }

    /// Loads gold/none baseline pairs, matched on the exact source string.
    pub fn load_baseline_pairs(&self) -> Result<Vec<BaselinePair>, StoreError> {
        let runs = self.load_runs()?;
        Ok(baseline_pairs(&runs))
    }
}

/// Parses one result file into normalized per-instance reports.
///
/// Each instance entry is decoded independently so one malformed record
/// cannot take the whole file down.
fn load_report_file(path: &Path) -> Result<BTreeMap<String, TestReport>, StoreError> {
    let text = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: BTreeMap<String, Value> =
        serde_json::from_str(&text).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let mut reports = BTreeMap::new();
    for (instance_id, value) in raw {
        match serde_json::from_value::<RawInstanceReport>(value) {
            Ok(report) => {
                reports.insert(instance_id, TestReport::from(report));
            }
            Err(err) => {
                warn!(
                    "Skipping malformed record '{}' in {}: {}",
                    instance_id,
                    path.display(),
                    err
                );
            }
        }
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::domain::models::report::BaselineKind;

    fn write_file(dir: &TempDir, name: &str, body: &str) {
        fs::write(dir.path().join(name), body).unwrap();
    }

    #[test]
    fn test_load_runs_sorted_by_filename() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "none_gen.json", "{}");
        write_file(&dir, "BotA__gen.json", "{}");
        write_file(&dir, "gold_gen.json", "{}");

        let store = ResultsStore::new(dir.path());
        let runs = store.load_runs().unwrap();
        assert_eq!(runs.len(), 3);
        assert!(matches!(
            runs[0].role,
            ResultRole::Agent { ref agent, .. } if agent == "BotA"
        ));
        assert!(matches!(
            runs[1].role,
            ResultRole::Baseline { kind: BaselineKind::Gold, .. }
        ));
    }

    #[test]
    fn test_unrecognized_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "gold_gen.json", "{}");
        write_file(&dir, "summary.json", "{}");
        write_file(&dir, "notes.txt", "not json");

        let store = ResultsStore::new(dir.path());
        assert_eq!(store.load_runs().unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_record_is_dropped_not_fatal() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "BotA__gen.json",
            r#"{
                "inst-1": {"n_resolved_tests": 2, "details": {"resolved": ["t1", "t2"]}},
                "inst-2": "not an object"
            }"#,
        );

        let store = ResultsStore::new(dir.path());
        let runs = store.load_runs().unwrap();
        assert_eq!(runs[0].reports.len(), 1);
        assert_eq!(runs[0].resolved_count("inst-1"), 2);
    }

    #[test]
    fn test_unparseable_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "gold_gen.json", "not json at all");

        let store = ResultsStore::new(dir.path());
        assert!(matches!(
            store.load_runs(),
            Err(StoreError::Json { .. })
        ));
    }

    #[test]
    fn test_missing_directory_errors() {
        let store = ResultsStore::new("/nonexistent/results");
        assert!(matches!(
            store.load_runs(),
            Err(StoreError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_empty_directory_errors() {
        let dir = TempDir::new().unwrap();
        let store = ResultsStore::new(dir.path());
        assert!(matches!(
            store.load_runs(),
            Err(StoreError::EmptyResultsDir(_))
        ));
    }

    #[test]
    fn test_load_groups_assembles_baselines() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "gold_gen-alpha.json", "{}");
        write_file(&dir, "none_gen-alpha.json", "{}");
        write_file(
            &dir,
            "BotA__gen-alpha-500-1.json",
            r#"{"inst-1": {"n_resolved_tests": 1, "details": {"resolved": ["t1"]}}}"#,
        );

        let store = ResultsStore::new(dir.path());
        let groups = store.load_groups().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].source, "gen-alpha-500-1");
        assert!(groups[0].gold.is_some());
        assert!(groups[0].none.is_some());
    }
}
