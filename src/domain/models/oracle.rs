//! Oracle and ensemble analysis reports.

use serde::{Deserialize, Serialize};

/// Per-instance routing entry: which agent the oracle would pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRouting {
    pub instance_id: String,
    /// Best agent at this instance, `None` when nobody covered anything.
    pub best_agent: Option<String>,
    /// Meaningful tests that agent covered here.
    pub covered: u64,
    /// Meaningful tests available here.
    pub available: u64,
}

/// Scores for one group: the best single agent against the two ceilings.
///
/// `ensemble_score >= oracle_score >= best_single_score` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleReport {
    pub source: String,
    pub n_agents: usize,
    /// Total meaningful tests across all instances.
    pub meaningful_total: u64,
    pub best_agent: String,
    pub best_single_score: u64,
    /// Per-instance best-agent routing ceiling.
    pub oracle_score: u64,
    /// Test-level union ceiling.
    pub ensemble_score: u64,
    pub routing: Vec<InstanceRouting>,
}

impl OracleReport {
    /// Percentage of the meaningful total, zero-safe.
    pub fn pct(&self, score: u64) -> f64 {
        percent(score, self.meaningful_total)
    }
}

/// The most complementary agent pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairReport {
    pub first: String,
    pub second: String,
    /// Distinct (instance, test) pairs the two agents solve together.
    pub union_score: u64,
    /// Improvement over the best single agent.
    pub gain_over_best: u64,
}

/// Difficulty profile for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub agent: String,
    /// Solves of tests below the hard-test threshold.
    pub hard_solved: u64,
    /// Tests this agent alone solved.
    pub unique_solved: u64,
}

/// Tests that passed with no fix applied but fail under the agent's patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRegression {
    pub agent: String,
    pub regressed: u64,
}

/// Complementarity analysis for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleReport {
    pub source: String,
    pub n_agents: usize,
    /// Distinct (instance, test) pairs any agent solved.
    pub solved_universe: u64,
    pub best_single_agent: String,
    pub best_single_score: u64,
    /// Present only with two or more agents.
    pub best_pair: Option<PairReport>,
    /// Solve-rate threshold below which a test counts as hard.
    pub hard_threshold: f64,
    pub hard_test_count: u64,
    /// Sorted by hard solves, then unique solves, both descending.
    pub profiles: Vec<AgentProfile>,
    /// Sorted ascending; fewer regressions is safer.
    pub regressions: Vec<AgentRegression>,
}

/// Zero-denominator-safe percentage.
#[allow(clippy::cast_precision_loss)]
pub fn percent(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_guards_zero_denominator() {
        assert_eq!(percent(5, 0), 0.0);
        assert!((percent(1, 4) - 25.0).abs() < f64::EPSILON);
        assert!((percent(3, 3) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_report_pct_uses_meaningful_total() {
        let report = OracleReport {
            source: "gen".to_string(),
            n_agents: 2,
            meaningful_total: 8,
            best_agent: "A".to_string(),
            best_single_score: 4,
            oracle_score: 6,
            ensemble_score: 7,
            routing: vec![],
        };
        assert!((report.pct(report.oracle_score) - 75.0).abs() < f64::EPSILON);
    }
}
