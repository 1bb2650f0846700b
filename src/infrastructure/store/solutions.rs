//! Solution-payload store: per-agent JSONL files keyed by instance ID.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::StoreError;

/// Key under which the selection label is stamped into chosen payloads.
pub const MODEL_NAME_KEY: &str = "model_name_or_path";

/// Loads agent solution payloads from `<agent>.jsonl` files.
///
/// Files are read once and cached; a missing or unreadable file yields an
/// empty payload map with a warning, never an error.
pub struct SolutionStore {
    solutions_dir: PathBuf,
    cache: BTreeMap<String, BTreeMap<String, Value>>,
}

impl SolutionStore {
    pub fn new<P: AsRef<Path>>(solutions_dir: P) -> Self {
        Self {
            solutions_dir: solutions_dir.as_ref().to_path_buf(),
            cache: BTreeMap::new(),
        }
    }

    /// All payloads for one agent, keyed by instance ID.
    pub fn payloads(&mut self, agent: &str) -> &BTreeMap<String, Value> {
        if !self.cache.contains_key(agent) {
            let loaded = self.load_file(agent);
            self.cache.insert(agent.to_string(), loaded);
        }
        &self.cache[agent]
    }

    /// The agent's payload for one instance, stamped with the output label.
    ///
    /// Returns `None` when the agent has no solution for the instance.
    pub fn stamped_payload(&mut self, agent: &str, instance: &str, label: &str) -> Option<Value> {
        let mut payload = self.payloads(agent).get(instance)?.clone();
        if let Value::Object(fields) = &mut payload {
            fields.insert(MODEL_NAME_KEY.to_string(), Value::String(label.to_string()));
        }
        Some(payload)
    }

    fn load_file(&self, agent: &str) -> BTreeMap<String, Value> {
        let path = self.solutions_dir.join(format!("{agent}.jsonl"));
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                warn!("Solution file not found: {}: {}", path.display(), err);
                return BTreeMap::new();
            }
        };

        let mut payloads = BTreeMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Ok(record) = serde_json::from_str::<Value>(line) else {
                continue;
            };
            let Some(instance_id) = record
                .get("instance_id")
                .and_then(Value::as_str)
                .map(str::to_string)
            else {
                continue;
            };
            payloads.insert(instance_id, record);
        }
        debug!(
            "Loaded {} solution payloads for '{}' from {}",
            payloads.len(),
            agent,
            path.display()
        );
        payloads
    }
}

/// Per-file outcome of a catalogue filter pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterStat {
    pub file: String,
    pub kept: usize,
    pub total: usize,
}

/// Copies each `*.jsonl` file under `input_dir` to `output_dir`, keeping only
/// lines whose `instance_id` is in `valid`.
///
/// Kept lines are written verbatim. Malformed lines count toward the total
/// but are never kept; blank lines are ignored entirely.
pub fn filter_solutions(
    input_dir: &Path,
    output_dir: &Path,
    valid: &BTreeSet<String>,
) -> Result<Vec<FilterStat>, StoreError> {
    if !input_dir.is_dir() {
        return Err(StoreError::NotADirectory(input_dir.to_path_buf()));
    }
    fs::create_dir_all(output_dir).map_err(|source| StoreError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = Vec::new();
    let entries = fs::read_dir(input_dir).map_err(|source| StoreError::Io {
        path: input_dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| StoreError::Io {
            path: input_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "jsonl") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut stats = Vec::new();
    for path in &paths {
        let Some(filename) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let text = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        let out_path = output_dir.join(filename);
        let out_file = File::create(&out_path).map_err(|source| StoreError::Write {
            path: out_path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(out_file);

        let mut kept = 0;
        let mut total = 0;
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            total += 1;
            let Ok(record) = serde_json::from_str::<Value>(line) else {
                continue;
            };
            let keep = record
                .get("instance_id")
                .and_then(Value::as_str)
                .is_some_and(|id| valid.contains(id));
            if keep {
                writeln!(writer, "{line}").map_err(|source| StoreError::Write {
                    path: out_path.clone(),
                    source,
                })?;
                kept += 1;
            }
        }
        writer.flush().map_err(|source| StoreError::Write {
            path: out_path.clone(),
            source,
        })?;

        stats.push(FilterStat {
            file: filename.to_string(),
            kept,
            total,
        });
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_payloads_keyed_by_instance_id() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("BotA.jsonl"),
            concat!(
                r#"{"instance_id": "inst-1", "model_patch": "diff-1"}"#,
                "\n",
                r#"{"instance_id": "inst-2", "model_patch": "diff-2"}"#,
                "\n",
            ),
        )
        .unwrap();

        let mut store = SolutionStore::new(dir.path());
        let payloads = store.payloads("BotA");
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads["inst-1"]["model_patch"], "diff-1");
    }

    #[test]
    fn test_blank_and_malformed_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("BotA.jsonl"),
            "\n{not json}\n{\"no_id\": true}\n{\"instance_id\": \"inst-1\"}\n",
        )
        .unwrap();

        let mut store = SolutionStore::new(dir.path());
        assert_eq!(store.payloads("BotA").len(), 1);
    }

    #[test]
    fn test_missing_file_yields_empty_map() {
        let dir = TempDir::new().unwrap();
        let mut store = SolutionStore::new(dir.path());
        assert!(store.payloads("Ghost").is_empty());
        assert!(store.stamped_payload("Ghost", "inst-1", "label").is_none());
    }

    #[test]
    fn test_stamped_payload_overwrites_model_name() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("BotA.jsonl"),
            r#"{"instance_id": "inst-1", "model_name_or_path": "BotA-v2", "model_patch": "diff"}"#,
        )
        .unwrap();

        let mut store = SolutionStore::new(dir.path());
        let payload = store
            .stamped_payload("BotA", "inst-1", "Agent_Selection_v1")
            .unwrap();
        assert_eq!(payload[MODEL_NAME_KEY], "Agent_Selection_v1");
        assert_eq!(payload["model_patch"], "diff");
        // The cached copy keeps its original stamp.
        assert_eq!(store.payloads("BotA")["inst-1"][MODEL_NAME_KEY], "BotA-v2");
    }

    #[test]
    fn test_filter_keeps_only_valid_instances() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(
            input.path().join("BotA.jsonl"),
            concat!(
                r#"{"instance_id": "inst-1", "model_patch": "d1"}"#,
                "\n",
                r#"{"instance_id": "inst-2", "model_patch": "d2"}"#,
                "\n",
                "broken line\n",
            ),
        )
        .unwrap();

        let valid: BTreeSet<String> = ["inst-2".to_string()].into();
        let stats = filter_solutions(input.path(), output.path(), &valid).unwrap();
        assert_eq!(
            stats,
            vec![FilterStat {
                file: "BotA.jsonl".to_string(),
                kept: 1,
                total: 3
            }]
        );

        let written = fs::read_to_string(output.path().join("BotA.jsonl")).unwrap();
        assert_eq!(written, "{\"instance_id\": \"inst-2\", \"model_patch\": \"d2\"}\n");
    }

    #[test]
    fn test_filter_missing_input_dir_errors() {
        let output = TempDir::new().unwrap();
        let valid = BTreeSet::new();
        assert!(matches!(
            filter_solutions(Path::new("/nonexistent"), output.path(), &valid),
            Err(StoreError::NotADirectory(_))
        ));
    }
}
