//! Sparse coverage index: which meaningful tests each agent solved where.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::models::group::EvalGroup;
use crate::domain::models::report::MeaningfulMap;

/// Per-agent, per-instance intersections of resolved tests with the
/// meaningful sets.
///
/// Every agent in the group appears; the inner maps are sparse (an instance
/// is present only when its intersection is non-empty, so a lookup on a
/// missing instance reads as zero coverage). Agents and instances iterate
/// in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageIndex {
    agents: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
}

impl CoverageIndex {
    /// Builds the index for one group against its meaningful map.
    pub fn build(group: &EvalGroup, meaningful: &MeaningfulMap) -> Self {
        let mut agents = BTreeMap::new();
        for (agent, record) in &group.agents {
            let mut per_instance = BTreeMap::new();
            for (instance, needed) in meaningful {
                if let Some(resolved) = record.resolved(instance) {
                    let hit: BTreeSet<String> = resolved.intersection(needed).cloned().collect();
                    if !hit.is_empty() {
                        per_instance.insert(instance.clone(), hit);
                    }
                }
            }
            agents.insert(agent.clone(), per_instance);
        }
        Self { agents }
    }

    pub fn n_agents(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Iterates agents with their per-instance coverage, in name order.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (&String, &BTreeMap<String, BTreeSet<String>>)> {
        self.agents.iter()
    }

    /// Covered meaningful tests for an agent at an instance; zero when
    /// either is unknown.
    pub fn covered(&self, agent: &str, instance: &str) -> u64 {
        self.covered_set(agent, instance)
            .map_or(0, |tests| tests.len() as u64)
    }

    pub fn covered_set(&self, agent: &str, instance: &str) -> Option<&BTreeSet<String>> {
        self.agents.get(agent)?.get(instance)
    }

    /// Total meaningful tests the agent covered across all instances.
    pub fn agent_total(&self, agent: &str) -> u64 {
        self.agents.get(agent).map_or(0, |per_instance| {
            per_instance.values().map(|tests| tests.len() as u64).sum()
        })
    }

    /// Instances where the agent covered at least one meaningful test.
    pub fn covered_instances(&self, agent: &str) -> usize {
        self.agents.get(agent).map_or(0, BTreeMap::len)
    }

    /// Every (instance, test) pair the agent solved, for set algebra across
    /// agents.
    pub fn solved_pairs(&self, agent: &str) -> BTreeSet<(&str, &str)> {
        self.agents.get(agent).map_or_else(BTreeSet::new, |per_instance| {
            per_instance
                .iter()
                .flat_map(|(instance, tests)| {
                    tests.iter().map(move |test| (instance.as_str(), test.as_str()))
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::models::report::{ResultRole, RunRecord, TestReport};

    fn agent_record(agent: &str, reports: &[(&str, &[&str])]) -> (String, RunRecord) {
        let reports: BTreeMap<String, TestReport> = reports
            .iter()
            .map(|(instance, resolved)| {
                let report = TestReport {
                    resolved_count: u32::try_from(resolved.len()).unwrap(),
                    resolved: resolved.iter().map(|t| (*t).to_string()).collect(),
                    unresolved: BTreeSet::new(),
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

    fn meaningful(entries: &[(&str, &[&str])]) -> MeaningfulMap {
        entries
            .iter()
            .map(|(instance, tests)| {
                (
                    (*instance).to_string(),
                    tests.iter().map(|t| (*t).to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_build_intersects_with_meaningful() {
        let group = group(vec![agent_record("A", &[("i1", &["t1", "t9"])])]);
        let map = meaningful(&[("i1", &["t1", "t2"])]);
        let index = CoverageIndex::build(&group, &map);
        assert_eq!(index.covered("A", "i1"), 1);
        assert!(index.covered_set("A", "i1").unwrap().contains("t1"));
    }

    #[test]
    fn test_empty_intersections_are_not_stored() {
        let group = group(vec![agent_record("A", &[("i1", &["t9"])])]);
        let map = meaningful(&[("i1", &["t1"])]);
        let index = CoverageIndex::build(&group, &map);
        assert!(index.covered_set("A", "i1").is_none());
        assert_eq!(index.covered("A", "i1"), 0);
    }

    #[test]
    fn test_missing_agent_and_instance_read_as_zero() {
        let group = group(vec![agent_record("A", &[("i1", &["t1"])])]);
        let map = meaningful(&[("i1", &["t1"])]);
        let index = CoverageIndex::build(&group, &map);
        assert_eq!(index.covered("Ghost", "i1"), 0);
        assert_eq!(index.covered("A", "i2"), 0);
        assert_eq!(index.agent_total("Ghost"), 0);
    }

    #[test]
    fn test_agent_with_no_coverage_still_listed() {
        let group = group(vec![
            agent_record("A", &[("i1", &["t1"])]),
            agent_record("B", &[]),
        ]);
        let map = meaningful(&[("i1", &["t1"])]);
        let index = CoverageIndex::build(&group, &map);
        assert_eq!(index.n_agents(), 2);
        assert_eq!(index.agent_total("B"), 0);
    }

    #[test]
    fn test_agent_total_sums_instances() {
        let group = group(vec![agent_record(
            "A",
            &[("i1", &["t1", "t2"]), ("i2", &["t3"])],
        )]);
        let map = meaningful(&[("i1", &["t1", "t2"]), ("i2", &["t3", "t4"])]);
        let index = CoverageIndex::build(&group, &map);
        assert_eq!(index.agent_total("A"), 3);
    }

    #[test]
    fn test_solved_pairs_flatten_in_order() {
        let group = group(vec![agent_record(
            "A",
            &[("i2", &["t1"]), ("i1", &["t2", "t1"])],
        )]);
        let map = meaningful(&[("i1", &["t1", "t2"]), ("i2", &["t1"])]);
        let index = CoverageIndex::build(&group, &map);
        let pairs: Vec<(&str, &str)> = index.solved_pairs("A").into_iter().collect();
        assert_eq!(pairs, vec![("i1", "t1"), ("i1", "t2"), ("i2", "t1")]);
    }
}
