//! Instance catalogues: files naming the benchmark instances a dataset
//! release contains, used to filter solution sets down to a shared subset.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::domain::StoreError;

/// Loads the instance IDs named by one catalogue file.
///
/// Accepted shapes: a JSON array of ID strings, a JSON array of objects
/// carrying `instance_id`, a JSON object keyed by instance ID, or JSONL
/// where each line carries `instance_id`.
pub fn load_instance_catalog(path: &Path) -> Result<BTreeSet<String>, StoreError> {
    let text = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let ids: BTreeSet<String> = match serde_json::from_str::<Value>(&text) {
        Ok(Value::Array(items)) => items.iter().filter_map(instance_id_of).collect(),
        Ok(Value::Object(entries)) => entries.keys().cloned().collect(),
        Ok(_) => BTreeSet::new(),
        Err(_) => text
            .lines()
            .filter_map(|line| serde_json::from_str::<Value>(line.trim()).ok())
            .filter_map(|record| instance_id_of(&record))
            .collect(),
    };

    if ids.is_empty() {
        return Err(StoreError::EmptyCatalog(path.to_path_buf()));
    }
    debug!("Loaded {} instance ids from {}", ids.len(), path.display());
    Ok(ids)
}

/// Intersects the instance sets of every given catalogue file.
///
/// An empty intersection is an error: filtering against it would silently
/// drop every solution.
pub fn catalog_intersection(paths: &[PathBuf]) -> Result<BTreeSet<String>, StoreError> {
    let mut paths_iter = paths.iter();
    let first = paths_iter.next().ok_or(StoreError::EmptyCatalogIntersection)?;
    let mut valid = load_instance_catalog(first)?;
    for path in paths_iter {
        let next = load_instance_catalog(path)?;
        valid.retain(|id| next.contains(id));
    }
    if valid.is_empty() {
        return Err(StoreError::EmptyCatalogIntersection);
    }
    Ok(valid)
}

fn instance_id_of(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        other => other
            .get("instance_id")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}
