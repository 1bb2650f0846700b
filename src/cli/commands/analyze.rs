//! Implementation of the `verdict analyze` subcommands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::cli::types::{AnalyzeArgs, AnalyzeCommands, CorrelationArgs, EnsembleArgs, OracleArgs};
use crate::domain::models::{
    CorrelationReport, CoverageReport, EnsembleReport, EvalGroup, MeaningfulMap, OracleReport,
    RunRecord, SummaryReport, VerdictConfig,
};
use crate::domain::EvalError;
use crate::infrastructure::store::{RealResultsStore, ResultsStore};
use crate::services::{CoverageIndex, MeaningfulDeriver, OracleAnalyzer, SummaryService};

pub fn execute(command: AnalyzeCommands, config: &VerdictConfig, json_mode: bool) -> Result<()> {
    match command {
        AnalyzeCommands::Summary(args) => summary(&args, config, json_mode),
        AnalyzeCommands::Coverage(args) => coverage(&args, config, json_mode),
        AnalyzeCommands::Oracle(args) => oracle(&args, config, json_mode),
        AnalyzeCommands::Ensemble(args) => ensemble(&args, config, json_mode),
        AnalyzeCommands::Correlation(args) => correlation(&args, config, json_mode),
    }
}

/// Baselines and derived inputs for one scorable group.
struct GroupInputs<'a> {
    gold: &'a RunRecord,
    meaningful: MeaningfulMap,
    index: CoverageIndex,
}

/// Derives the inputs every analysis needs, or logs why the group is skipped.
fn prepare(group: &EvalGroup) -> Option<GroupInputs<'_>> {
    let (gold, none) = match group.require_baselines() {
        Ok(pair) => pair,
        Err(err) => {
            warn!("Skipping group '{}': {}", group.source, err);
            return None;
        }
    };

    let meaningful = MeaningfulDeriver::derive(gold, none);
    if meaningful.is_empty() {
        warn!(
            "Skipping group '{}': no test survives the gold/no-fix subtraction",
            group.source
        );
        return None;
    }

    let index = CoverageIndex::build(group, &meaningful);
    Some(GroupInputs {
        gold,
        meaningful,
        index,
    })
}

fn resolve_results_dir(args: &AnalyzeArgs, config: &VerdictConfig) -> PathBuf {
    args.results
        .clone()
        .unwrap_or_else(|| config.paths.results_dir.clone())
}

/// Loads all groups from `dir`, optionally narrowed to a single source.
fn load_groups(dir: &Path, only: Option<&str>) -> Result<Vec<EvalGroup>> {
    let store = ResultsStore::new(dir);
    let groups = store
        .load_groups()
        .with_context(|| format!("Failed to load result reports from {}", dir.display()))?;

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

#[derive(Debug, serde::Serialize)]
pub struct SummaryCommandOutput {
    pub groups: Vec<SummaryReport>,
    pub skipped: Vec<String>,
}

impl CommandOutput for SummaryCommandOutput {
    fn to_human(&self) -> String {
        let formatter = TableFormatter::new();
        let mut lines = Vec::new();
        for report in &self.groups {
            lines.push(format!(
                "Group: {} ({} agents, {} meaningful tests in {} instances)",
                report.source, report.n_agents, report.meaningful_total, report.meaningful_instances
            ));
            lines.push(formatter.format_summary(report));
            if !report.unique.is_empty() {
                lines.push("Unique contributions:".to_string());
                lines.push(formatter.format_unique(&report.unique));
            }
        }
        push_footer(&mut lines, self.groups.is_empty(), &self.skipped);
        lines.join("\n")
    }
}

fn summary(args: &AnalyzeArgs, config: &VerdictConfig, json_mode: bool) -> Result<()> {
    let dir = resolve_results_dir(args, config);
    let groups = load_groups(&dir, args.only.as_deref())?;

    let mut reports = Vec::new();
    let mut skipped = Vec::new();
    for group in &groups {
        let Some(inputs) = prepare(group) else {
            skipped.push(group.source.clone());
            continue;
        };
        match SummaryService::summarize(group, &inputs.meaningful, &inputs.index) {
            Ok(report) => reports.push(report),
            Err(err) => {
                warn!("Skipping group '{}': {}", group.source, err);
                skipped.push(group.source.clone());
            }
        }
    }

    let output_data = SummaryCommandOutput {
        groups: reports,
        skipped,
    };
    output(&output_data, json_mode);
    Ok(())
}

#[derive(Debug, serde::Serialize)]
pub struct CoverageCommandOutput {
    pub groups: Vec<CoverageReport>,
    pub skipped: Vec<String>,
}

impl CommandOutput for CoverageCommandOutput {
    fn to_human(&self) -> String {
        let formatter = TableFormatter::new();
        let mut lines = Vec::new();
        for report in &self.groups {
            lines.push(format!(
                "Group: {} ({} meaningful tests, {} gold instances)",
                report.source, report.meaningful_total, report.gold_instances
            ));
            lines.push(formatter.format_coverage(report));
        }
        push_footer(&mut lines, self.groups.is_empty(), &self.skipped);
        lines.join("\n")
    }
}

fn coverage(args: &AnalyzeArgs, config: &VerdictConfig, json_mode: bool) -> Result<()> {
    let dir = resolve_results_dir(args, config);
    let groups = load_groups(&dir, args.only.as_deref())?;

    let mut reports = Vec::new();
    let mut skipped = Vec::new();
    for group in &groups {
        let Some(inputs) = prepare(group) else {
            skipped.push(group.source.clone());
            continue;
        };
        match SummaryService::universe_coverage(group, inputs.gold, &inputs.meaningful, &inputs.index)
        {
            Ok(report) => reports.push(report),
            Err(err) => {
                warn!("Skipping group '{}': {}", group.source, err);
                skipped.push(group.source.clone());
            }
        }
    }

    let output_data = CoverageCommandOutput {
        groups: reports,
        skipped,
    };
    output(&output_data, json_mode);
    Ok(())
}

#[derive(Debug, serde::Serialize)]
pub struct OracleCommandOutput {
    pub groups: Vec<OracleReport>,
    pub skipped: Vec<String>,
    #[serde(skip)]
    pub detail: bool,
}

impl CommandOutput for OracleCommandOutput {
    fn to_human(&self) -> String {
        let formatter = TableFormatter::new();
        let mut lines = Vec::new();
        for report in &self.groups {
            lines.push(format!(
                "Group: {} ({} agents, {} meaningful tests)",
                report.source, report.n_agents, report.meaningful_total
            ));
            lines.push(formatter.format_oracle(report));
            if self.detail {
                lines.push("Per-instance routing:".to_string());
                lines.push(formatter.format_routing(&report.routing));
            }
        }
        push_footer(&mut lines, self.groups.is_empty(), &self.skipped);
        lines.join("\n")
    }
}

fn oracle(args: &OracleArgs, config: &VerdictConfig, json_mode: bool) -> Result<()> {
    let dir = resolve_results_dir(&args.common, config);
    let groups = load_groups(&dir, args.common.only.as_deref())?;
    let analyzer = OracleAnalyzer::new(config.analysis.hard_test_threshold);

    let mut reports = Vec::new();
    let mut skipped = Vec::new();
    for group in &groups {
        let Some(inputs) = prepare(group) else {
            skipped.push(group.source.clone());
            continue;
        };
        match analyzer.oracle(&group.source, &inputs.meaningful, &inputs.index) {
            Ok(report) => reports.push(report),
            Err(err) => {
                warn!("Skipping group '{}': {}", group.source, err);
                skipped.push(group.source.clone());
            }
        }
    }

    let output_data = OracleCommandOutput {
        groups: reports,
        skipped,
        detail: args.detail,
    };
    output(&output_data, json_mode);
    Ok(())
}

#[derive(Debug, serde::Serialize)]
pub struct EnsembleCommandOutput {
    pub groups: Vec<EnsembleReport>,
    pub skipped: Vec<String>,
}

impl CommandOutput for EnsembleCommandOutput {
    fn to_human(&self) -> String {
        let formatter = TableFormatter::new();
        let mut lines = Vec::new();
        for report in &self.groups {
            lines.push(format!(
                "Group: {} ({} agents, {} solved tests in the union)",
                report.source, report.n_agents, report.solved_universe
            ));
            lines.push(format!(
                "Best single: {} ({} tests)",
                report.best_single_agent, report.best_single_score
            ));
            if let Some(pair) = &report.best_pair {
                lines.push(format!(
                    "Best pair: {} + {} ({} tests, +{} over best single)",
                    pair.first, pair.second, pair.union_score, pair.gain_over_best
                ));
            }
            lines.push(format!(
                "Hard tests (solved by under {:.0}% of agents): {}",
                report.hard_threshold * 100.0,
                report.hard_test_count
            ));
            lines.push(formatter.format_profiles(&report.profiles));
            lines.push("Regressions against the no-fix baseline:".to_string());
            lines.push(formatter.format_regressions(&report.regressions));
        }
        push_footer(&mut lines, self.groups.is_empty(), &self.skipped);
        lines.join("\n")
    }
}

fn ensemble(args: &EnsembleArgs, config: &VerdictConfig, json_mode: bool) -> Result<()> {
    let dir = resolve_results_dir(&args.common, config);
    let groups = load_groups(&dir, args.common.only.as_deref())?;

    let threshold = args
        .hard_threshold
        .unwrap_or(config.analysis.hard_test_threshold);
    anyhow::ensure!(
        threshold > 0.0 && threshold <= 1.0,
        "hard-test threshold must be within (0, 1], got {threshold}"
    );
    let analyzer = OracleAnalyzer::new(threshold);

    let mut reports = Vec::new();
    let mut skipped = Vec::new();
    for group in &groups {
        let Some(inputs) = prepare(group) else {
            skipped.push(group.source.clone());
            continue;
        };
        match analyzer.ensemble(group, &inputs.meaningful, &inputs.index) {
            Ok(report) => reports.push(report),
            Err(err) => {
                warn!("Skipping group '{}': {}", group.source, err);
                skipped.push(group.source.clone());
            }
        }
    }

    let output_data = EnsembleCommandOutput {
        groups: reports,
        skipped,
    };
    output(&output_data, json_mode);
    Ok(())
}

#[derive(Debug, serde::Serialize)]
pub struct CorrelationCommandOutput {
    pub real_results_dir: PathBuf,
    pub groups: Vec<CorrelationReport>,
    pub skipped: Vec<String>,
}

impl CommandOutput for CorrelationCommandOutput {
    fn to_human(&self) -> String {
        let formatter = TableFormatter::new();
        let mut lines = Vec::new();
        for report in &self.groups {
            let mode = if report.strict { " (strict)" } else { "" };
            lines.push(format!("Group: {}{}", report.source, mode));
            lines.push(formatter.format_correlation(&report.agents));
            lines.push(format!(
                "Aggregate precision {:.2}, recall {:.2}",
                report.aggregate_precision, report.aggregate_recall
            ));
            if report.aggregate_precision < 0.5 {
                lines.push(format!(
                    "Low precision ({:.2}): meaningful tests often pass without the real fix.",
                    report.aggregate_precision
                ));
            }
            if report.aggregate_recall < 0.5 {
                lines.push(format!(
                    "Low recall ({:.2}): meaningful tests miss many of the real fixes.",
                    report.aggregate_recall
                ));
            }
        }
        push_footer(&mut lines, self.groups.is_empty(), &self.skipped);
        lines.join("\n")
    }
}

fn correlation(args: &CorrelationArgs, config: &VerdictConfig, json_mode: bool) -> Result<()> {
    let dir = resolve_results_dir(&args.common, config);
    let groups = load_groups(&dir, args.common.only.as_deref())?;

    let real_dir = args
        .real_results
        .clone()
        .unwrap_or_else(|| config.paths.real_results_dir.clone());
    let real_store = RealResultsStore::new(&real_dir);

    let mut reports = Vec::new();
    let mut skipped = Vec::new();
    for group in &groups {
        let Some(inputs) = prepare(group) else {
            skipped.push(group.source.clone());
            continue;
        };

        let agents: Vec<String> = group.agents.keys().cloned().collect();
        let real = real_store.resolved_for_all(&agents);
        if real.is_empty() {
            warn!(
                "Skipping group '{}': no real results in {} for any of its agents",
                group.source,
                real_dir.display()
            );
            skipped.push(group.source.clone());
            continue;
        }

        match SummaryService::correlate(group, &inputs.meaningful, &real, args.strict) {
            Ok(report) => reports.push(report),
            Err(err) => {
                warn!("Skipping group '{}': {}", group.source, err);
                skipped.push(group.source.clone());
            }
        }
    }

    let output_data = CorrelationCommandOutput {
        real_results_dir: real_dir,
        groups: reports,
        skipped,
    };
    output(&output_data, json_mode);
    Ok(())
}

/// Shared trailer: empty-report notice plus the skipped-group list.
fn push_footer(lines: &mut Vec<String>, no_reports: bool, skipped: &[String]) {
    if no_reports {
        lines.push("No group produced a scorable report.".to_string());
    }
    if !skipped.is_empty() {
        lines.push(format!("Skipped groups: {}", skipped.join(", ")));
    }
}
