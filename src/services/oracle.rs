//! Oracle and ensemble scoring over a group's coverage index.
//!
//! "Oracle" is the ceiling of per-instance agent routing; "ensemble" is the
//! ceiling of merging every agent's solved tests. Both are upper bounds on
//! what any real selection strategy can reach.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::error::EvalError;
use crate::domain::models::group::EvalGroup;
use crate::domain::models::oracle::{
    AgentProfile, AgentRegression, EnsembleReport, InstanceRouting, OracleReport, PairReport,
};
use crate::domain::models::report::MeaningfulMap;

use super::coverage::CoverageIndex;
use super::meaningful::MeaningfulDeriver;

/// Computes oracle and ensemble reports for one group.
pub struct OracleAnalyzer {
    hard_threshold: f64,
}

impl OracleAnalyzer {
    /// `hard_threshold` is the solve-rate fraction below which a test counts
    /// as hard.
    pub fn new(hard_threshold: f64) -> Self {
        Self { hard_threshold }
    }

    /// Best single agent against the routing and union ceilings.
    pub fn oracle(
        &self,
        source: &str,
        meaningful: &MeaningfulMap,
        index: &CoverageIndex,
    ) -> Result<OracleReport, EvalError> {
        Self::check_inputs(source, meaningful, index)?;

        let mut best_agent = String::new();
        let mut best_single_score = 0u64;
        for (agent, _) in index.iter() {
            let score = index.agent_total(agent);
            if best_agent.is_empty() || score > best_single_score {
                best_agent = agent.clone();
                best_single_score = score;
            }
        }

        let mut oracle_score = 0u64;
        let mut ensemble_score = 0u64;
        let mut routing = Vec::with_capacity(meaningful.len());
        for (instance, needed) in meaningful {
            let mut instance_best: Option<&String> = None;
            let mut instance_max = 0u64;
            let mut union: BTreeSet<&str> = BTreeSet::new();
            for (agent, _) in index.iter() {
                let covered = index.covered(agent, instance);
                if covered > instance_max {
                    instance_max = covered;
                    instance_best = Some(agent);
                }
                if let Some(tests) = index.covered_set(agent, instance) {
                    union.extend(tests.iter().map(String::as_str));
                }
            }
            oracle_score += instance_max;
            ensemble_score += union.len() as u64;
            routing.push(InstanceRouting {
                instance_id: instance.clone(),
                best_agent: instance_best.cloned(),
                covered: instance_max,
                available: needed.len() as u64,
            });
        }

        Ok(OracleReport {
            source: source.to_string(),
            n_agents: index.n_agents(),
            meaningful_total: MeaningfulDeriver::total(meaningful),
            best_agent,
            best_single_score,
            oracle_score,
            ensemble_score,
            routing,
        })
    }

    /// Pairwise complementarity, specialist attribution, hard tests, and
    /// per-agent regressions.
    pub fn ensemble(
        &self,
        group: &EvalGroup,
        meaningful: &MeaningfulMap,
        index: &CoverageIndex,
    ) -> Result<EnsembleReport, EvalError> {
        Self::check_inputs(&group.source, meaningful, index)?;

        let agents: Vec<&String> = index.iter().map(|(agent, _)| agent).collect();
        let pairs_by_agent: BTreeMap<&str, BTreeSet<(&str, &str)>> = agents
            .iter()
            .map(|agent| (agent.as_str(), index.solved_pairs(agent)))
            .collect();

        let mut best_single_agent = "";
        let mut best_single_score = 0u64;
        for agent in &agents {
            let score = pairs_by_agent[agent.as_str()].len() as u64;
            if best_single_agent.is_empty() || score > best_single_score {
                best_single_agent = agent;
                best_single_score = score;
            }
        }

        let mut best_pair: Option<PairReport> = None;
        for (i, first) in agents.iter().enumerate() {
            for second in &agents[i + 1..] {
                let union = pairs_by_agent[first.as_str()]
                    .union(&pairs_by_agent[second.as_str()])
                    .count() as u64;
                if best_pair.as_ref().is_none_or(|best| union > best.union_score) {
                    best_pair = Some(PairReport {
                        first: (*first).clone(),
                        second: (*second).clone(),
                        union_score: union,
                        gain_over_best: union.saturating_sub(best_single_score),
                    });
                }
            }
        }

        let mut solve_counts: BTreeMap<(&str, &str), u64> = BTreeMap::new();
        for pairs in pairs_by_agent.values() {
            for pair in pairs {
                *solve_counts.entry(*pair).or_insert(0) += 1;
            }
        }
        #[allow(clippy::cast_precision_loss)]
        let hard_cutoff = self.hard_threshold * agents.len() as f64;
        let hard_tests: BTreeSet<(&str, &str)> = solve_counts
            .iter()
            .filter(|(_, count)| (**count as f64) < hard_cutoff)
            .map(|(pair, _)| *pair)
            .collect();

        let mut profiles: Vec<AgentProfile> = agents
            .iter()
            .map(|agent| {
                let solved = &pairs_by_agent[agent.as_str()];
                let unique_solved = solved
                    .iter()
                    .filter(|pair| solve_counts[*pair] == 1)
                    .count() as u64;
                let hard_solved = solved.intersection(&hard_tests).count() as u64;
                AgentProfile {
                    agent: (*agent).clone(),
                    hard_solved,
                    unique_solved,
                }
            })
            .collect();
        profiles.sort_by(|a, b| {
            b.hard_solved
                .cmp(&a.hard_solved)
                .then(b.unique_solved.cmp(&a.unique_solved))
                .then(a.agent.cmp(&b.agent))
        });

        let mut regressions: Vec<AgentRegression> = group
            .agents
            .iter()
            .map(|(agent, record)| {
                let mut regressed = 0u64;
                if let Some(none) = &group.none {
                    for (instance, report) in &record.reports {
                        if let Some(none_resolved) = none.resolved(instance) {
                            regressed +=
                                none_resolved.difference(&report.resolved).count() as u64;
                        }
                    }
                }
                AgentRegression {
                    agent: agent.clone(),
                    regressed,
                }
            })
            .collect();
        regressions.sort_by(|a, b| a.regressed.cmp(&b.regressed).then(a.agent.cmp(&b.agent)));

        Ok(EnsembleReport {
            source: group.source.clone(),
            n_agents: agents.len(),
            solved_universe: solve_counts.len() as u64,
            best_single_agent: best_single_agent.to_string(),
            best_single_score,
            best_pair,
            hard_threshold: self.hard_threshold,
            hard_test_count: hard_tests.len() as u64,
            profiles,
            regressions,
        })
    }

    fn check_inputs(
        source: &str,
        meaningful: &MeaningfulMap,
        index: &CoverageIndex,
    ) -> Result<(), EvalError> {
        if index.is_empty() {
            return Err(EvalError::NoAgentRuns {
                source: source.to_string(),
            });
        }
        if meaningful.is_empty() {
            return Err(EvalError::NoMeaningfulTests {
                source: source.to_string(),
            });
        }
        Ok(())
    }
}
