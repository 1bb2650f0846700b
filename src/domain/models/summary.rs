//! Reporting models for the summary, universe-coverage, and correlation
//! commands.

use serde::{Deserialize, Serialize};

use super::oracle::percent;

/// Per-agent totals against one group's meaningful tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub agent: String,
    pub meaningful_solved: u64,
    /// Instances where the agent solved at least one meaningful test.
    pub meaningful_instances: usize,
    /// Mean over all meaningful instances of the share of that instance's
    /// meaningful set the agent covers, in percent.
    pub mean_instance_pct: f64,
    /// Sum of raw resolved counts across the agent's reports.
    pub raw_resolved: u64,
    /// Tests solved out of every test the agent's reports mention.
    pub tests_solved: u64,
    pub tests_attempted: u64,
}

impl AgentSummary {
    pub fn meaningful_pct(&self, meaningful_total: u64) -> f64 {
        percent(self.meaningful_solved, meaningful_total)
    }

    pub fn attempt_pct(&self) -> f64 {
        percent(self.tests_solved, self.tests_attempted)
    }
}

/// Meaningful tests only one agent solved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueContribution {
    pub agent: String,
    pub count: u64,
    /// `instance::test` labels, sorted.
    pub examples: Vec<String>,
}

/// One group's summary table plus unique-solve attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub source: String,
    pub n_agents: usize,
    pub meaningful_total: u64,
    /// Instances carrying at least one meaningful test.
    pub meaningful_instances: usize,
    /// Sorted by meaningful solves descending, then agent name.
    pub agents: Vec<AgentSummary>,
    /// Sorted by count descending, then agent name.
    pub unique: Vec<UniqueContribution>,
}

/// Per-agent coverage of the gold test universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniverseCoverage {
    pub agent: String,
    pub meaningful_solved: u64,
    /// Size of the agent's own test universe (resolved plus unresolved).
    pub tests_available: u64,
    /// Instances where the agent resolved at least one test.
    pub solved_any: usize,
    /// Instances where the agent's resolved count reached half the gold
    /// universe there.
    pub solved_half: usize,
    /// Instances where the agent's resolved set equals the gold universe.
    pub solved_all: usize,
}

impl UniverseCoverage {
    pub fn meaningful_pct(&self, meaningful_total: u64) -> f64 {
        percent(self.meaningful_solved, meaningful_total)
    }

    pub fn instance_pct(&self, gold_instances: usize) -> f64 {
        percent(self.solved_any as u64, gold_instances as u64)
    }
}

/// One group's universe-coverage report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub source: String,
    pub meaningful_total: u64,
    /// Gold instance count, the instance-coverage denominator.
    pub gold_instances: usize,
    pub agents: Vec<UniverseCoverage>,
}

/// Confusion-matrix stats for one agent's meaningful-test predictions
/// against real benchmark outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationStats {
    pub agent: String,
    pub true_positives: u64,
    pub false_positives: u64,
    pub false_negatives: u64,
    pub true_negatives: u64,
}

impl CorrelationStats {
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

/// One group's correlation report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationReport {
    pub source: String,
    /// Whether prediction required the full meaningful set.
    pub strict: bool,
    /// Sorted by F1 descending, then agent name.
    pub agents: Vec<CorrelationStats>,
    pub aggregate_precision: f64,
    pub aggregate_recall: f64,
}

/// Zero-denominator-safe ratio in `[0, 1]`.
#[allow(clippy::cast_precision_loss)]
pub fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
