//! Implementation of the `verdict results` subcommands.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

use crate::cli::output::progress::{create_spinner_with_message, ProgressBarExt};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::cli::types::{ResultsCommands, ResultsFilterArgs};
use crate::domain::models::{ResultRole, VerdictConfig};
use crate::infrastructure::store::{CuratedCopy, RealResultsStore, ResultsStore};
use crate::services::AgentMatcher;

pub fn execute(command: ResultsCommands, config: &VerdictConfig, json_mode: bool) -> Result<()> {
    match command {
        ResultsCommands::Filter(args) => filter(&args, config, json_mode),
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ResultsFilterOutput {
    pub scraped_dir: PathBuf,
    pub output_dir: PathBuf,
    pub local_agents: usize,
    pub copies: Vec<CuratedCopy>,
}

impl CommandOutput for ResultsFilterOutput {
    fn to_human(&self) -> String {
        if self.copies.is_empty() {
            return format!(
                "No file in {} matched any of the {} local agent(s).",
                self.scraped_dir.display(),
                self.local_agents
            );
        }
        let mut lines = vec![TableFormatter::new().format_curated(&self.copies)];
        lines.push(format!(
            "Copied {} file(s) to {}",
            self.copies.len(),
            self.output_dir.display()
        ));
        lines.join("\n")
    }
}

fn filter(args: &ResultsFilterArgs, config: &VerdictConfig, json_mode: bool) -> Result<()> {
    let results_dir = args
        .results
        .clone()
        .unwrap_or_else(|| config.paths.results_dir.clone());
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| config.paths.real_results_dir.clone());

    let store = ResultsStore::new(&results_dir);
    let runs = store.load_runs().with_context(|| {
        format!(
            "Failed to load result reports from {}",
            results_dir.display()
        )
    })?;

    let agents: BTreeSet<String> = runs
        .iter()
        .filter_map(|run| match &run.role {
            ResultRole::Agent { agent, .. } => Some(agent.clone()),
            ResultRole::Baseline { .. } => None,
        })
        .collect();
    if agents.is_empty() {
        warn!(
            "No agent runs in {}, nothing will match",
            results_dir.display()
        );
    }
    let matcher = AgentMatcher::new(agents);

    let real_store = RealResultsStore::new(&output_dir);
    let spinner = create_spinner_with_message("Matching scraped results against local agents");
    let copies = match real_store.curate_scraped(&args.scraped, &matcher) {
        Ok(copies) => copies,
        Err(err) => {
            spinner.finish_error("Curation failed");
            return Err(err).with_context(|| {
                format!("Failed to curate scraped results from {}", args.scraped.display())
            });
        }
    };
    spinner.finish_success(format!("Matched {} file(s)", copies.len()));

    let output_data = ResultsFilterOutput {
        scraped_dir: args.scraped.clone(),
        output_dir,
        local_agents: matcher.len(),
        copies,
    };
    output(&output_data, json_mode);
    Ok(())
}
