//! Implementation of the `verdict solutions` subcommands.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::output::progress::{create_spinner_with_message, ProgressBarExt};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::cli::types::{SolutionsCommands, SolutionsFilterArgs};
use crate::domain::models::VerdictConfig;
use crate::infrastructure::store::{catalog_intersection, filter_solutions, FilterStat};

pub fn execute(command: SolutionsCommands, config: &VerdictConfig, json_mode: bool) -> Result<()> {
    match command {
        SolutionsCommands::Filter(args) => filter(&args, config, json_mode),
    }
}

#[derive(Debug, serde::Serialize)]
pub struct SolutionsFilterOutput {
    pub output_dir: PathBuf,
    pub valid_instances: usize,
    pub files: Vec<FilterStat>,
}

impl CommandOutput for SolutionsFilterOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Catalogue intersection holds {} instance id(s)",
            self.valid_instances
        )];
        if self.files.is_empty() {
            lines.push("No JSONL files to filter.".to_string());
        } else {
            lines.push(TableFormatter::new().format_filter_stats(&self.files));
            let kept: usize = self.files.iter().map(|stat| stat.kept).sum();
            let total: usize = self.files.iter().map(|stat| stat.total).sum();
            lines.push(format!(
                "Kept {kept} of {total} solution(s) under {}",
                self.output_dir.display()
            ));
        }
        lines.join("\n")
    }
}

fn filter(args: &SolutionsFilterArgs, config: &VerdictConfig, json_mode: bool) -> Result<()> {
    let solutions_dir = args
        .solutions
        .clone()
        .unwrap_or_else(|| config.paths.solutions_dir.clone());

    let valid = catalog_intersection(&args.catalog)
        .context("Failed to build the instance catalogue intersection")?;

    let spinner = create_spinner_with_message(format!(
        "Filtering solutions to {} instance id(s)",
        valid.len()
    ));
    let files = match filter_solutions(&solutions_dir, &args.output, &valid) {
        Ok(files) => files,
        Err(err) => {
            spinner.finish_error("Filtering failed");
            return Err(err).with_context(|| {
                format!("Failed to filter solutions from {}", solutions_dir.display())
            });
        }
    };
    spinner.finish_success(format!("Filtered {} file(s)", files.len()));

    let output_data = SolutionsFilterOutput {
        output_dir: args.output.clone(),
        valid_instances: valid.len(),
        files,
    };
    output(&output_data, json_mode);
    Ok(())
}
