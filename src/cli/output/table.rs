//! Table rendering for analysis reports, selection runs, and store
//! maintenance commands, built on comfy-table with traffic-light coloring
//! for percentage and score cells.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::domain::models::{
    AgentProfile, AgentRegression, CorrelationStats, CoverageReport, InstanceRouting,
    OracleReport, SelectionStats, SummaryReport, UniqueContribution,
};
use crate::infrastructure::store::{CuratedCopy, FilterStat, MeaningfulCount};

use super::truncate;

/// Renders report tables for the terminal.
pub struct TableFormatter {
    use_colors: bool,
    /// Width cap in characters; `None` lets comfy-table size freely.
    max_width: Option<usize>,
}

impl TableFormatter {
    /// Formatter with color support detected from the environment.
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Formatter with explicit color and width settings.
    pub fn with_config(use_colors: bool, max_width: Option<usize>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format the per-agent meaningful-test summary as a table
    pub fn format_summary(&self, report: &SummaryReport) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Agent").add_attribute(Attribute::Bold),
            Cell::new("Meaningful").add_attribute(Attribute::Bold),
            Cell::new("%").add_attribute(Attribute::Bold),
            Cell::new("Avg Inst %").add_attribute(Attribute::Bold),
            Cell::new("Raw Resolved").add_attribute(Attribute::Bold),
            Cell::new("Attempted").add_attribute(Attribute::Bold),
            Cell::new("Attempt %").add_attribute(Attribute::Bold),
        ]);

        for agent in &report.agents {
            table.add_row(vec![
                Cell::new(truncate(&agent.agent, 40)),
                Cell::new(format!(
                    "{}/{}",
                    agent.meaningful_solved, report.meaningful_total
                )),
                self.pct_cell(agent.meaningful_pct(report.meaningful_total)),
                self.pct_cell(agent.mean_instance_pct),
                Cell::new(agent.raw_resolved.to_string()),
                Cell::new(agent.tests_attempted.to_string()),
                self.pct_cell(agent.attempt_pct()),
            ]);
        }

        table.to_string()
    }

    /// Format single-solver attributions as a table
    pub fn format_unique(&self, unique: &[UniqueContribution]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Agent").add_attribute(Attribute::Bold),
            Cell::new("Unique Solves").add_attribute(Attribute::Bold),
            Cell::new("Examples").add_attribute(Attribute::Bold),
        ]);

        for contribution in unique {
            table.add_row(vec![
                Cell::new(truncate(&contribution.agent, 40)),
                Cell::new(contribution.count.to_string()),
                Cell::new(truncate(&contribution.examples.join(", "), 60)),
            ]);
        }

        table.to_string()
    }

    /// Format gold-universe coverage as a table
    pub fn format_coverage(&self, report: &CoverageReport) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Agent").add_attribute(Attribute::Bold),
            Cell::new("Meaningful").add_attribute(Attribute::Bold),
            Cell::new("Tests Avail").add_attribute(Attribute::Bold),
            Cell::new(">=1 Test").add_attribute(Attribute::Bold),
            Cell::new(">=Half").add_attribute(Attribute::Bold),
            Cell::new("All").add_attribute(Attribute::Bold),
            Cell::new("Inst %").add_attribute(Attribute::Bold),
        ]);

        for agent in &report.agents {
            table.add_row(vec![
                Cell::new(truncate(&agent.agent, 40)),
                Cell::new(format!(
                    "{}/{}",
                    agent.meaningful_solved, report.meaningful_total
                )),
                Cell::new(agent.tests_available.to_string()),
                Cell::new(format!("{}/{}", agent.solved_any, report.gold_instances)),
                Cell::new(agent.solved_half.to_string()),
                Cell::new(agent.solved_all.to_string()),
                self.pct_cell(agent.instance_pct(report.gold_instances)),
            ]);
        }

        table.to_string()
    }

    /// Format the best-single / oracle / ensemble score block as a table
    pub fn format_oracle(&self, report: &OracleReport) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Score").add_attribute(Attribute::Bold),
            Cell::new("%").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new(format!("Best single ({})", report.best_agent)),
            Cell::new(format!(
                "{}/{}",
                report.best_single_score, report.meaningful_total
            )),
            self.pct_cell(report.pct(report.best_single_score)),
        ]);
        table.add_row(vec![
            Cell::new("Oracle routing"),
            Cell::new(format!("{}/{}", report.oracle_score, report.meaningful_total)),
            self.pct_cell(report.pct(report.oracle_score)),
        ]);
        table.add_row(vec![
            Cell::new("Ensemble union"),
            Cell::new(format!(
                "{}/{}",
                report.ensemble_score, report.meaningful_total
            )),
            self.pct_cell(report.pct(report.ensemble_score)),
        ]);

        table.to_string()
    }

    /// Format per-instance oracle routing as a table
    pub fn format_routing(&self, routing: &[InstanceRouting]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Instance").add_attribute(Attribute::Bold),
            Cell::new("Best Agent").add_attribute(Attribute::Bold),
            Cell::new("Covered").add_attribute(Attribute::Bold),
        ]);

        for entry in routing {
            let best = entry.best_agent.as_deref().unwrap_or("-");
            let best_cell = if self.use_colors && entry.best_agent.is_none() {
                Cell::new(best).fg(Color::DarkGrey)
            } else {
                Cell::new(best)
            };

            table.add_row(vec![
                Cell::new(truncate(&entry.instance_id, 50)),
                best_cell,
                Cell::new(format!("{}/{}", entry.covered, entry.available)),
            ]);
        }

        table.to_string()
    }

    /// Format specialist profiles (hard and unique solves) as a table
    pub fn format_profiles(&self, profiles: &[AgentProfile]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Agent").add_attribute(Attribute::Bold),
            Cell::new("Hard Solved").add_attribute(Attribute::Bold),
            Cell::new("Unique Solved").add_attribute(Attribute::Bold),
        ]);

        for profile in profiles {
            table.add_row(vec![
                Cell::new(truncate(&profile.agent, 40)),
                Cell::new(profile.hard_solved.to_string()),
                Cell::new(profile.unique_solved.to_string()),
            ]);
        }

        table.to_string()
    }

    /// Format regression counts against the no-fix baseline as a table
    pub fn format_regressions(&self, regressions: &[AgentRegression]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Agent").add_attribute(Attribute::Bold),
            Cell::new("Regressed Tests").add_attribute(Attribute::Bold),
        ]);

        for regression in regressions {
            let count_cell = if self.use_colors && regression.regressed > 0 {
                Cell::new(regression.regressed.to_string()).fg(Color::Red)
            } else {
                Cell::new(regression.regressed.to_string())
            };
            table.add_row(vec![Cell::new(truncate(&regression.agent, 40)), count_cell]);
        }

        table.to_string()
    }

    /// Format prediction-quality stats against real benchmark runs as a table
    pub fn format_correlation(&self, agents: &[CorrelationStats]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Agent").add_attribute(Attribute::Bold),
            Cell::new("Prec").add_attribute(Attribute::Bold),
            Cell::new("Recall").add_attribute(Attribute::Bold),
            Cell::new("F1").add_attribute(Attribute::Bold),
            Cell::new("TP").add_attribute(Attribute::Bold),
            Cell::new("FP (False Hope)").add_attribute(Attribute::Bold),
            Cell::new("FN (Missed)").add_attribute(Attribute::Bold),
            Cell::new("TN").add_attribute(Attribute::Bold),
        ]);

        for stats in agents {
            let f1 = stats.f1();
            let f1_cell = if self.use_colors {
                Cell::new(format!("{f1:.2}")).fg(f1_color(f1))
            } else {
                Cell::new(format!("{f1:.2}"))
            };

            table.add_row(vec![
                Cell::new(truncate(&stats.agent, 40)),
                Cell::new(format!("{:.2}", stats.precision())),
                Cell::new(format!("{:.2}", stats.recall())),
                f1_cell,
                Cell::new(stats.true_positives.to_string()),
                Cell::new(stats.false_positives.to_string()),
                Cell::new(stats.false_negatives.to_string()),
                Cell::new(stats.true_negatives.to_string()),
            ]);
        }

        table.to_string()
    }

    /// Format per-group selection outcome tallies as a table
    pub fn format_selection_stats(&self, stats: &[SelectionStats]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Source").add_attribute(Attribute::Bold),
            Cell::new("Instances").add_attribute(Attribute::Bold),
            Cell::new("No Tie").add_attribute(Attribute::Bold),
            Cell::new("Score Break").add_attribute(Attribute::Bold),
            Cell::new("Random Break").add_attribute(Attribute::Bold),
            Cell::new("Missing Payloads").add_attribute(Attribute::Bold),
        ]);

        for group in stats {
            let missing_cell = if self.use_colors && group.missing_payloads > 0 {
                Cell::new(group.missing_payloads.to_string()).fg(Color::Yellow)
            } else {
                Cell::new(group.missing_payloads.to_string())
            };

            table.add_row(vec![
                Cell::new(truncate(&group.source, 40)),
                Cell::new(group.instances.to_string()),
                Cell::new(group.no_tie.to_string()),
                Cell::new(group.score_break.to_string()),
                Cell::new(group.random_break.to_string()),
                missing_cell,
            ]);
        }

        table.to_string()
    }

    /// Format meaningful-test file counts as a table
    pub fn format_meaningful_counts(&self, counts: &[MeaningfulCount]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("File").add_attribute(Attribute::Bold),
            Cell::new("Instances").add_attribute(Attribute::Bold),
        ]);

        for count in counts {
            let instances_cell = match count.instances {
                Some(n) => Cell::new(n.to_string()),
                None if self.use_colors => Cell::new("unreadable").fg(Color::Red),
                None => Cell::new("unreadable"),
            };
            table.add_row(vec![Cell::new(truncate(&count.file, 50)), instances_cell]);
        }

        table.to_string()
    }

    /// Format kept/total rows from a solution filter pass as a table
    pub fn format_filter_stats(&self, stats: &[FilterStat]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("File").add_attribute(Attribute::Bold),
            Cell::new("Kept").add_attribute(Attribute::Bold),
            Cell::new("Total").add_attribute(Attribute::Bold),
        ]);

        for stat in stats {
            table.add_row(vec![
                Cell::new(truncate(&stat.file, 50)),
                Cell::new(stat.kept.to_string()),
                Cell::new(stat.total.to_string()),
            ]);
        }

        table.to_string()
    }

    /// Format scraped-to-local copies from a curation pass as a table
    pub fn format_curated(&self, copies: &[CuratedCopy]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Scraped").add_attribute(Attribute::Bold),
            Cell::new("Agent").add_attribute(Attribute::Bold),
            Cell::new("Written").add_attribute(Attribute::Bold),
        ]);

        for copy in copies {
            table.add_row(vec![
                Cell::new(truncate(&copy.scraped, 40)),
                Cell::new(truncate(&copy.agent, 40)),
                Cell::new(copy.written.display().to_string()),
            ]);
        }

        table.to_string()
    }

    /// Build a percentage cell, colored by band when colors are enabled
    fn pct_cell(&self, pct: f64) -> Cell {
        let text = format!("{pct:.1}%");
        if self.use_colors {
            Cell::new(text).fg(pct_color(pct))
        } else {
            Cell::new(text)
        }
    }

    /// Empty table with the shared preset and width settings applied.
    fn create_base_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        if let Some(width) = self.max_width {
            table.set_width(width as u16);
        }
        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Color support, honoring `NO_COLOR` and dumb terminals.
fn supports_color() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    env::var("TERM").map_or(true, |term| term != "dumb")
}

/// Map a percentage to a traffic-light color
fn pct_color(pct: f64) -> Color {
    if pct >= 75.0 {
        Color::Green
    } else if pct >= 40.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Map an F1 score to a traffic-light color
fn f1_color(f1: f64) -> Color {
    if f1 >= 0.7 {
        Color::Green
    } else if f1 >= 0.4 {
        Color::Yellow
    } else {
        Color::Red
    }
}
