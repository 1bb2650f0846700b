//! Selection outputs: per-instance records of which agent won and how.

use serde::{Deserialize, Serialize};

/// How the winning agent was decided for an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieStatus {
    /// A single agent held the top resolved count.
    NoTie,
    /// The external score table broke a resolved-count tie.
    ScoreBreak,
    /// A seeded draw broke a tie the score table could not.
    RandomBreak,
}

impl TieStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoTie => "no_tie",
            Self::ScoreBreak => "score_break",
            Self::RandomBreak => "random_break",
        }
    }
}

impl std::fmt::Display for TieStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line of the selection metadata output.
///
/// Field declaration order fixes the serialized key order; downstream
/// tooling diffs these files, so it must not drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRecord {
    pub instance_id: String,
    pub chosen_agent: String,
    /// The winner's raw resolved count for this instance.
    pub n_resolved_tests: u32,
    pub tie_status: TieStatus,
    /// The winner's external score when any tie occurred, else `null`.
    pub tie_break_score: Option<f64>,
    /// Agents tied at the top resolved count, sorted.
    pub candidate_agents: Vec<String>,
    pub total_agents_evaluated: usize,
}

/// Tie-status tallies for one processed group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionStats {
    pub source: String,
    pub instances: usize,
    pub no_tie: usize,
    pub score_break: usize,
    pub random_break: usize,
    /// Winners whose solution payload could not be found.
    pub missing_payloads: usize,
}

impl SelectionStats {
    pub fn from_records(
        source: impl Into<String>,
        records: &[SelectionRecord],
        missing_payloads: usize,
    ) -> Self {
        let count = |status: TieStatus| {
            records
                .iter()
                .filter(|record| record.tie_status == status)
                .count()
        };
        Self {
            source: source.into(),
            instances: records.len(),
            no_tie: count(TieStatus::NoTie),
            score_break: count(TieStatus::ScoreBreak),
            random_break: count(TieStatus::RandomBreak),
            missing_payloads,
        }
    }
}
