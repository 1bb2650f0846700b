//! Selection output writer: per-group metadata and chosen-solution JSONL.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::domain::models::selection::SelectionRecord;
use crate::domain::StoreError;

/// Writes selection results under `<output>/metadata/` and `<output>/chosen/`.
///
/// Both files are written for every processed group, even when empty, so a
/// rerun always produces the same tree.
pub struct SelectionOutput {
    output_dir: PathBuf,
}

impl SelectionOutput {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.output_dir.join("metadata")
    }

    pub fn chosen_dir(&self) -> PathBuf {
        self.output_dir.join("chosen")
    }

    /// Writes one group's records and chosen payloads as `<source>.jsonl`.
    ///
    /// Returns the metadata and chosen paths, in that order.
    pub fn write_group(
        &self,
        source: &str,
        records: &[SelectionRecord],
        chosen: &[Value],
    ) -> Result<(PathBuf, PathBuf), StoreError> {
        let meta_path = self.metadata_dir().join(format!("{source}.jsonl"));
        write_jsonl(&meta_path, records)?;

        let chosen_path = self.chosen_dir().join(format!("{source}.jsonl"));
        write_jsonl(&chosen_path, chosen)?;

        debug!(
            "Wrote {} records and {} chosen payloads for '{}'",
            records.len(),
            chosen.len(),
            source
        );
        Ok((meta_path, chosen_path))
    }
}

fn write_jsonl<T: serde::Serialize>(path: &Path, entries: &[T]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StoreError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(path).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    for entry in entries {
        let line = serde_json::to_string(entry).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        writeln!(writer, "{line}").map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    writer.flush().map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}
