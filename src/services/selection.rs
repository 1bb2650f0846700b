//! Cascading per-instance agent selection.
//!
//! Ranking cascades through three stages: raw resolved count, then the
//! external score table, then a seeded draw. The RNG is seeded once per
//! group and advances only when a draw actually happens, so outputs are
//! reproducible run over run.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::domain::models::group::EvalGroup;
use crate::domain::models::selection::{SelectionRecord, TieStatus};

/// Runs the selection cascade over evaluation groups.
pub struct SelectionEngine {
    scores: BTreeMap<String, f64>,
    seed: u64,
}

impl SelectionEngine {
    pub fn new(scores: BTreeMap<String, f64>, seed: u64) -> Self {
        Self { scores, seed }
    }

    /// External score for an agent; agents absent from the table score 0.
    pub fn score(&self, agent: &str) -> f64 {
        self.scores.get(agent).copied().unwrap_or(0.0)
    }

    /// Selects a winner for every instance any agent in the group reported,
    /// in lexicographic instance order.
    pub fn run_group(&self, group: &EvalGroup) -> Vec<SelectionRecord> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        group
            .agent_instances()
            .iter()
            .filter_map(|instance| self.select_instance(group, instance, &mut rng))
            .collect()
    }

    /// One instance through the cascade. `None` only for an agentless group.
    #[allow(clippy::float_cmp)]
    fn select_instance(
        &self,
        group: &EvalGroup,
        instance: &str,
        rng: &mut StdRng,
    ) -> Option<SelectionRecord> {
        let max_resolved = group
            .agents
            .values()
            .map(|record| record.resolved_count(instance))
            .max()?;
        let candidates: Vec<&str> = group
            .agents
            .iter()
            .filter(|(_, record)| record.resolved_count(instance) == max_resolved)
            .map(|(agent, _)| agent.as_str())
            .collect();

        let (chosen, tie_status, tie_break_score) = match candidates.as_slice() {
            [single] => (*single, TieStatus::NoTie, None),
            _ => {
                let best_score = candidates
                    .iter()
                    .map(|agent| self.score(agent))
                    .fold(f64::MIN, f64::max);
                let top: Vec<&str> = candidates
                    .iter()
                    .copied()
                    .filter(|agent| self.score(agent) == best_score)
                    .collect();
                match top.as_slice() {
                    [single] => (*single, TieStatus::ScoreBreak, Some(best_score)),
                    _ => {
                        let drawn = top.choose(rng).copied()?;
                        (drawn, TieStatus::RandomBreak, Some(best_score))
                    }
                }
            }
        };

        Some(SelectionRecord {
            instance_id: instance.to_string(),
            chosen_agent: chosen.to_string(),
            n_resolved_tests: max_resolved,
            tie_status,
            tie_break_score,
            candidate_agents: candidates.iter().map(|agent| (*agent).to_string()).collect(),
            total_agents_evaluated: group.n_agents(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::models::report::{ResultRole, RunRecord, TestReport};

    fn agent_record(agent: &str, counts: &[(&str, u32)]) -> (String, RunRecord) {
        let reports: BTreeMap<String, TestReport> = counts
            .iter()
            .map(|(instance, n)| {
                let report = TestReport {
                    resolved_count: *n,
                    ..TestReport::default()
                };
                ((*instance).to_string(), report)
            })
            .collect();
        let record = RunRecord::new(
            ResultRole::Agent {
                agent: agent.to_string(),
                testgen: "gen".to_string(),
            },
            reports,
        );
        (agent.to_string(), record)
    }

    fn group(agents: Vec<(String, RunRecord)>) -> EvalGroup {
        let mut group = EvalGroup::new("gen");
        group.agents = agents.into_iter().collect();
        group
    }

    fn scores(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries
            .iter()
            .map(|(agent, score)| ((*agent).to_string(), *score))
            .collect()
    }

    #[test]
    fn test_single_agent_wins_without_tie() {
        let group = group(vec![agent_record("A", &[("i1", 3)])]);
        let engine = SelectionEngine::new(BTreeMap::new(), 42);
        let records = engine.run_group(&group);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].chosen_agent, "A");
        assert_eq!(records[0].n_resolved_tests, 3);
        assert_eq!(records[0].tie_status, TieStatus::NoTie);
        assert_eq!(records[0].tie_break_score, None);
        assert_eq!(records[0].candidate_agents, vec!["A"]);
        assert_eq!(records[0].total_agents_evaluated, 1);
    }

    #[test]
    fn test_primary_stage_picks_highest_count() {
        let group = group(vec![
            agent_record("A", &[("i1", 2)]),
            agent_record("B", &[("i1", 5)]),
            agent_record("C", &[("i1", 1)]),
        ]);
        let engine = SelectionEngine::new(BTreeMap::new(), 42);
        let records = engine.run_group(&group);
        assert_eq!(records[0].chosen_agent, "B");
        assert_eq!(records[0].tie_status, TieStatus::NoTie);
        assert_eq!(records[0].candidate_agents, vec!["B"]);
    }

    #[test]
    fn test_missing_instance_counts_as_zero() {
        let group = group(vec![
            agent_record("A", &[("i1", 0)]),
            agent_record("B", &[("i2", 4)]),
        ]);
        let engine = SelectionEngine::new(BTreeMap::new(), 42);
        let records = engine.run_group(&group);
        // i1: A reported 0, B did not report it, so both tie at zero.
        assert_eq!(records[0].instance_id, "i1");
        assert_eq!(records[0].candidate_agents, vec!["A", "B"]);
        // i2: only B reported anything.
        assert_eq!(records[1].instance_id, "i2");
        assert_eq!(records[1].chosen_agent, "B");
        assert_eq!(records[1].tie_status, TieStatus::NoTie);
    }

    #[test]
    fn test_score_break_picks_top_scorer() {
        let group = group(vec![
            agent_record("A", &[("i1", 2)]),
            agent_record("B", &[("i1", 2)]),
            agent_record("C", &[("i1", 1)]),
        ]);
        let engine = SelectionEngine::new(scores(&[("A", 0.8), ("B", 0.6)]), 42);
        let records = engine.run_group(&group);
        assert_eq!(records[0].chosen_agent, "A");
        assert_eq!(records[0].tie_status, TieStatus::ScoreBreak);
        assert_eq!(records[0].tie_break_score, Some(0.8));
        assert_eq!(records[0].candidate_agents, vec!["A", "B"]);
        assert_eq!(records[0].total_agents_evaluated, 3);
    }

    #[test]
    fn test_unscored_agents_default_to_zero() {
        let group = group(vec![
            agent_record("A", &[("i1", 2)]),
            agent_record("B", &[("i1", 2)]),
        ]);
        let engine = SelectionEngine::new(scores(&[("B", 0.1)]), 42);
        let records = engine.run_group(&group);
        assert_eq!(records[0].chosen_agent, "B");
        assert_eq!(records[0].tie_status, TieStatus::ScoreBreak);
        assert_eq!(records[0].tie_break_score, Some(0.1));
    }

    #[test]
    fn test_random_break_draws_from_top_scorers() {
        let group = group(vec![
            agent_record("A", &[("i1", 2)]),
            agent_record("B", &[("i1", 2)]),
            agent_record("C", &[("i1", 2)]),
        ]);
        let engine = SelectionEngine::new(scores(&[("A", 0.5), ("B", 0.5), ("C", 0.2)]), 42);
        let records = engine.run_group(&group);
        assert_eq!(records[0].tie_status, TieStatus::RandomBreak);
        assert_eq!(records[0].tie_break_score, Some(0.5));
        assert!(["A", "B"].contains(&records[0].chosen_agent.as_str()));
        assert_eq!(records[0].candidate_agents, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_rerun_with_same_seed_is_identical() {
        let group = group(vec![
            agent_record("A", &[("i1", 1), ("i2", 3), ("i3", 2)]),
            agent_record("B", &[("i1", 1), ("i2", 3), ("i3", 2)]),
            agent_record("C", &[("i1", 1), ("i3", 2)]),
        ]);
        let engine = SelectionEngine::new(BTreeMap::new(), 7);
        let first = engine.run_group(&group);
        let second = engine.run_group(&group);
        assert_eq!(first, second);
        let json_first = serde_json::to_string(&first).unwrap();
        let json_second = serde_json::to_string(&second).unwrap();
        assert_eq!(json_first, json_second);
    }

    #[test]
    fn test_records_follow_instance_order() {
        let group = group(vec![agent_record("A", &[("i3", 1), ("i1", 2), ("i2", 0)])]);
        let engine = SelectionEngine::new(BTreeMap::new(), 42);
        let ids: Vec<String> = engine
            .run_group(&group)
            .into_iter()
            .map(|record| record.instance_id)
            .collect();
        assert_eq!(ids, vec!["i1", "i2", "i3"]);
    }

    #[test]
    fn test_agentless_group_yields_no_records() {
        let group = group(vec![]);
        let engine = SelectionEngine::new(BTreeMap::new(), 42);
        assert!(engine.run_group(&group).is_empty());
    }
}
