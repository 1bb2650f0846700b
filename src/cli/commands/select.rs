//! Implementation of the `verdict select` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cli::output::progress::{create_progress_bar, ProgressBarExt};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::cli::types::SelectArgs;
use crate::domain::models::{EvalGroup, SelectionStats, VerdictConfig};
use crate::domain::EvalError;
use crate::infrastructure::store::{ResultsStore, ScoreStore, SelectionOutput, SolutionStore};
use crate::services::SelectionEngine;

#[derive(Debug, serde::Serialize)]
pub struct SelectCommandOutput {
    pub seed: u64,
    pub label: String,
    pub output_dir: PathBuf,
    pub groups: Vec<SelectionStats>,
    pub skipped: Vec<String>,
}

impl CommandOutput for SelectCommandOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Selection with seed {} and label \"{}\"",
            self.seed, self.label
        )];
        if self.groups.is_empty() {
            lines.push("No group produced selection records.".to_string());
        } else {
            lines.push(TableFormatter::new().format_selection_stats(&self.groups));
            lines.push(format!(
                "Outputs written under {}/metadata and {}/chosen",
                self.output_dir.display(),
                self.output_dir.display()
            ));
        }
        if !self.skipped.is_empty() {
            lines.push(format!("Skipped groups: {}", self.skipped.join(", ")));
        }
        lines.join("\n")
    }
}

pub fn execute(args: SelectArgs, config: &VerdictConfig, json_mode: bool) -> Result<()> {
    let results_dir = args
        .results
        .clone()
        .unwrap_or_else(|| config.paths.results_dir.clone());
    let scores_path = args
        .scores
        .clone()
        .unwrap_or_else(|| config.paths.scores_path.clone());
    let solutions_dir = args
        .solutions
        .clone()
        .unwrap_or_else(|| config.paths.solutions_dir.clone());
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| config.paths.output_dir.clone());
    let seed = args.seed.unwrap_or(config.selection.seed);
    let label = args
        .label
        .clone()
        .unwrap_or_else(|| config.selection.output_label.clone());

    let store = ResultsStore::new(&results_dir);
    let groups = store.load_groups().with_context(|| {
        format!(
            "Failed to load result reports from {}",
            results_dir.display()
        )
    })?;
    let groups = filter_only(groups, args.only.as_deref())?;

    let engine = SelectionEngine::new(ScoreStore::new(&scores_path).load(), seed);
    let mut solutions = SolutionStore::new(&solutions_dir);
    let writer = SelectionOutput::new(&output_dir);

    let pb = create_progress_bar(groups.len() as u64);
    let mut stats = Vec::new();
    let mut skipped = Vec::new();
    let mut total_missing = 0usize;

    for group in &groups {
        pb.set_message(format!("Selecting for {}", group.source));
        let records = engine.run_group(group);

        let mut chosen: Vec<Value> = Vec::with_capacity(records.len());
        let mut missing = 0usize;
        for record in &records {
            match solutions.stamped_payload(&record.chosen_agent, &record.instance_id, &label) {
                Some(payload) => chosen.push(payload),
                None => {
                    warn!(
                        "No solution payload for agent '{}' on instance '{}', dropping it",
                        record.chosen_agent, record.instance_id
                    );
                    missing += 1;
                }
            }
        }

        match writer.write_group(&group.source, &records, &chosen) {
            Ok((meta_path, chosen_path)) => {
                debug!(
                    "Wrote {} and {}",
                    meta_path.display(),
                    chosen_path.display()
                );
                stats.push(SelectionStats::from_records(
                    group.source.clone(),
                    &records,
                    missing,
                ));
                total_missing += missing;
            }
            Err(err) => {
                warn!("Skipping outputs for group '{}': {}", group.source, err);
                skipped.push(group.source.clone());
            }
        }
        pb.inc(1);
    }

    if total_missing > 0 {
        pb.finish_warning(format!("{total_missing} solution payload(s) missing"));
    } else {
        pb.finish_success(format!("Selections written for {} group(s)", stats.len()));
    }

    let output_data = SelectCommandOutput {
        seed,
        label,
        output_dir,
        groups: stats,
        skipped,
    };
    output(&output_data, json_mode);
    Ok(())
}

/// Narrows the group list to one source, erroring if it is absent.
fn filter_only(groups: Vec<EvalGroup>, only: Option<&str>) -> Result<Vec<EvalGroup>> {
    match only {
        Some(source) => {
            let groups: Vec<EvalGroup> = groups
                .into_iter()
                .filter(|group| group.source == source)
                .collect();
            if groups.is_empty() {
                return Err(EvalError::GroupNotFound {
                    source: source.to_string(),
                }
                .into());
            }
            Ok(groups)
        }
        None => Ok(groups),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_only_keeps_matching_source() {
        let groups = vec![EvalGroup::new("gen-a"), EvalGroup::new("gen-b")];
        let filtered = filter_only(groups, Some("gen-b")).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].source, "gen-b");
    }

    #[test]
    fn test_filter_only_unknown_source_errors() {
        let groups = vec![EvalGroup::new("gen-a")];
        let err = filter_only(groups, Some("gen-z")).unwrap_err();
        assert!(err.to_string().contains("gen-z"));
    }

    #[test]
    fn test_filter_only_without_flag_keeps_everything() {
        let groups = vec![EvalGroup::new("gen-a"), EvalGroup::new("gen-b")];
        assert_eq!(filter_only(groups, None).unwrap().len(), 2);
    }

    #[test]
    fn test_select_output_mentions_seed_and_dirs() {
        let output_data = SelectCommandOutput {
            seed: 42,
            label: "Agent_Selection_v1".to_string(),
            output_dir: PathBuf::from("out"),
            groups: vec![SelectionStats {
                source: "gen-a".to_string(),
                instances: 3,
                no_tie: 3,
                score_break: 0,
                random_break: 0,
                missing_payloads: 0,
            }],
            skipped: vec![],
        };
        let text = output_data.to_human();
        assert!(text.contains("seed 42"));
        assert!(text.contains("out/metadata"));
        assert!(text.contains("out/chosen"));
    }
}
