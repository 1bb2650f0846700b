//! Implementation of the `verdict meaningful` subcommands.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

use crate::cli::output::progress::{create_spinner_with_message, ProgressBarExt};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::cli::types::{MeaningfulCommands, MeaningfulCountArgs, MeaningfulSaveArgs};
use crate::domain::models::VerdictConfig;
use crate::infrastructure::store::{
    MeaningfulCount, MeaningfulStore, MeaningfulUnion, ResultsStore,
};
use crate::services::MeaningfulDeriver;

/// Directory created under the results directory when no output is given.
const DEFAULT_SUBDIR: &str = "meaningful_tests";

pub fn execute(command: MeaningfulCommands, config: &VerdictConfig, json_mode: bool) -> Result<()> {
    match command {
        MeaningfulCommands::Save(args) => save(&args, config, json_mode),
        MeaningfulCommands::Count(args) => count(&args, config, json_mode),
    }
}

#[derive(Debug, serde::Serialize)]
pub struct SavedMeaningful {
    pub source: String,
    pub path: PathBuf,
    pub instances: usize,
    pub tests: u64,
}

#[derive(Debug, serde::Serialize)]
pub struct MeaningfulSaveOutput {
    pub output_dir: PathBuf,
    pub union_path: PathBuf,
    pub files: Vec<SavedMeaningful>,
    pub skipped: Vec<String>,
}

impl CommandOutput for MeaningfulSaveOutput {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if self.files.is_empty() {
            lines.push("No source produced meaningful tests.".to_string());
        } else {
            lines.push(format!(
                "Saved meaningful tests under {}:",
                self.output_dir.display()
            ));
            for file in &self.files {
                lines.push(format!(
                    "  - {}: {} instance(s), {} test(s)",
                    file.source, file.instances, file.tests
                ));
            }
        }
        lines.push(format!("Union written to {}", self.union_path.display()));
        if !self.skipped.is_empty() {
            lines.push(format!("Skipped sources: {}", self.skipped.join(", ")));
        }
        lines.join("\n")
    }
}

fn save(args: &MeaningfulSaveArgs, config: &VerdictConfig, json_mode: bool) -> Result<()> {
    let results_dir = args
        .results
        .clone()
        .unwrap_or_else(|| config.paths.results_dir.clone());
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| results_dir.join(DEFAULT_SUBDIR));

    let store = ResultsStore::new(&results_dir);
    let pairs = store.load_baseline_pairs().with_context(|| {
        format!(
            "Failed to load result reports from {}",
            results_dir.display()
        )
    })?;

    let meaningful_store = MeaningfulStore::new(&output_dir);
    let spinner = create_spinner_with_message("Deriving meaningful tests");

    let mut union: MeaningfulUnion = BTreeMap::new();
    let mut files = Vec::new();
    let mut skipped = Vec::new();

    for pair in &pairs {
        let Some(none) = &pair.none else {
            warn!("No no-fix baseline for source '{}', skipping", pair.source);
            skipped.push(pair.source.clone());
            continue;
        };

        let meaningful = MeaningfulDeriver::derive(&pair.gold, none);
        if meaningful.is_empty() {
            warn!("No meaningful tests for source '{}', skipping", pair.source);
            skipped.push(pair.source.clone());
            continue;
        }

        let path = match meaningful_store.save(&pair.source, &meaningful) {
            Ok(path) => path,
            Err(err) => {
                warn!("Could not save source '{}': {}", pair.source, err);
                skipped.push(pair.source.clone());
                continue;
            }
        };

        files.push(SavedMeaningful {
            source: pair.source.clone(),
            path,
            instances: meaningful.len(),
            tests: MeaningfulDeriver::total(&meaningful),
        });
        for (instance, tests) in meaningful {
            union.entry(instance).or_default().insert(pair.source.clone(), tests);
        }
    }

    let union_path = match meaningful_store.save_union(&union) {
        Ok(path) => path,
        Err(err) => {
            spinner.finish_error("Failed to write the union file");
            return Err(err).context("Failed to write the meaningful-test union");
        }
    };
    spinner.finish_success(format!("Saved {} meaningful file(s)", files.len()));

    let output_data = MeaningfulSaveOutput {
        output_dir,
        union_path,
        files,
        skipped,
    };
    output(&output_data, json_mode);
    Ok(())
}

#[derive(Debug, serde::Serialize)]
pub struct MeaningfulCountOutput {
    pub dir: PathBuf,
    pub files: Vec<MeaningfulCount>,
    pub total_instances: usize,
}

impl CommandOutput for MeaningfulCountOutput {
    fn to_human(&self) -> String {
        if self.files.is_empty() {
            return format!("No JSON files in {}", self.dir.display());
        }
        let mut lines = vec![TableFormatter::new().format_meaningful_counts(&self.files)];
        lines.push(format!(
            "{} instance(s) across {} file(s)",
            self.total_instances,
            self.files.len()
        ));
        lines.join("\n")
    }
}

fn count(args: &MeaningfulCountArgs, config: &VerdictConfig, json_mode: bool) -> Result<()> {
    let dir = args
        .dir
        .clone()
        .unwrap_or_else(|| config.paths.results_dir.join(DEFAULT_SUBDIR));

    let store = MeaningfulStore::new(&dir);
    let files = store
        .count_files()
        .with_context(|| format!("Failed to scan {}", dir.display()))?;
    let total_instances = files.iter().filter_map(|count| count.instances).sum();

    let output_data = MeaningfulCountOutput {
        dir,
        files,
        total_instances,
    };
    output(&output_data, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_output_lists_files_and_union() {
        let output_data = MeaningfulSaveOutput {
            output_dir: PathBuf::from("results/meaningful_tests"),
            union_path: PathBuf::from("results/meaningful_tests/meaningful_union.json"),
            files: vec![SavedMeaningful {
                source: "gen-a".to_string(),
                path: PathBuf::from("results/meaningful_tests/meaningful_gen-a.json"),
                instances: 4,
                tests: 11,
            }],
            skipped: vec!["gen-b".to_string()],
        };
        let text = output_data.to_human();
        assert!(text.contains("gen-a: 4 instance(s), 11 test(s)"));
        assert!(text.contains("meaningful_union.json"));
        assert!(text.contains("Skipped sources: gen-b"));
    }

    #[test]
    fn test_count_output_totals_readable_files() {
        let output_data = MeaningfulCountOutput {
            dir: PathBuf::from("meaningful_tests"),
            files: vec![
                MeaningfulCount {
                    file: "meaningful_gen-a.json".to_string(),
                    instances: Some(4),
                },
                MeaningfulCount {
                    file: "broken.json".to_string(),
                    instances: None,
                },
            ],
            total_instances: 4,
        };
        let text = output_data.to_human();
        assert!(text.contains("4 instance(s) across 2 file(s)"));
    }

    #[test]
    fn test_count_output_empty_dir_notice() {
        let output_data = MeaningfulCountOutput {
            dir: PathBuf::from("meaningful_tests"),
            files: vec![],
            total_instances: 0,
        };
        assert!(output_data.to_human().contains("No JSON files"));
    }
}
