//! Summary, universe-coverage, and correlation reports over one group.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::error::EvalError;
use crate::domain::models::group::EvalGroup;
use crate::domain::models::report::{MeaningfulMap, RunRecord};
use crate::domain::models::summary::{
    ratio, AgentSummary, CorrelationReport, CorrelationStats, CoverageReport, SummaryReport,
    UniqueContribution, UniverseCoverage,
};

use super::coverage::CoverageIndex;
use super::meaningful::MeaningfulDeriver;

/// Builds the reporting views the analyze commands print.
pub struct SummaryService;

impl SummaryService {
    /// Per-agent meaningful and raw totals plus unique-solve attribution.
    pub fn summarize(
        group: &EvalGroup,
        meaningful: &MeaningfulMap,
        index: &CoverageIndex,
    ) -> Result<SummaryReport, EvalError> {
        ensure_scorable(&group.source, meaningful, index)?;

        let mut agents: Vec<AgentSummary> = group
            .agents
            .iter()
            .map(|(agent, record)| {
                let mut raw_resolved = 0u64;
                let mut tests_solved = 0u64;
                let mut tests_attempted = 0u64;
                for report in record.reports.values() {
                    raw_resolved += u64::from(report.resolved_count);
                    tests_solved += report.resolved.len() as u64;
                    tests_attempted += (report.resolved.len() + report.unresolved.len()) as u64;
                }

                // Meaningful sets are non-empty by construction, and
                // ensure_scorable guarantees at least one instance.
                #[allow(clippy::cast_precision_loss)]
                let mean_instance_pct = 100.0
                    * meaningful
                        .iter()
                        .map(|(instance, needed)| {
                            index.covered(agent, instance) as f64 / needed.len() as f64
                        })
                        .sum::<f64>()
                    / meaningful.len() as f64;

                AgentSummary {
                    agent: agent.clone(),
                    meaningful_solved: index.agent_total(agent),
                    meaningful_instances: index.covered_instances(agent),
                    mean_instance_pct,
                    raw_resolved,
                    tests_solved,
                    tests_attempted,
                }
            })
            .collect();
        agents.sort_by(|a, b| {
            b.meaningful_solved
                .cmp(&a.meaningful_solved)
                .then_with(|| a.agent.cmp(&b.agent))
        });

        let mut solvers: BTreeMap<(&str, &str), Vec<&str>> = BTreeMap::new();
        for (agent, _) in index.iter() {
            for pair in index.solved_pairs(agent) {
                solvers.entry(pair).or_default().push(agent.as_str());
            }
        }
        let mut unique_by_agent: BTreeMap<&str, UniqueContribution> = BTreeMap::new();
        for ((instance, test), agents_here) in &solvers {
            if let [solo] = agents_here.as_slice() {
                let entry = unique_by_agent
                    .entry(solo)
                    .or_insert_with(|| UniqueContribution {
                        agent: (*solo).to_string(),
                        count: 0,
                        examples: Vec::new(),
                    });
                entry.count += 1;
                entry.examples.push(format!("{instance}::{test}"));
            }
        }
        let mut unique: Vec<UniqueContribution> = unique_by_agent.into_values().collect();
        unique.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.agent.cmp(&b.agent)));

        Ok(SummaryReport {
            source: group.source.clone(),
            n_agents: group.n_agents(),
            meaningful_total: MeaningfulDeriver::total(meaningful),
            meaningful_instances: meaningful.len(),
            agents,
            unique,
        })
    }

    /// Agent coverage of the gold test universe.
    ///
    /// `solved_half` compares the agent's full resolved count against half
    /// the gold universe at that instance; gold instances with an empty
    /// universe are skipped by the three solve counters but still count in
    /// the instance-percentage denominator.
    pub fn universe_coverage(
        group: &EvalGroup,
        gold: &RunRecord,
        meaningful: &MeaningfulMap,
        index: &CoverageIndex,
    ) -> Result<CoverageReport, EvalError> {
        ensure_scorable(&group.source, meaningful, index)?;

        let gold_universe: BTreeMap<&String, BTreeSet<String>> = gold
            .reports
            .iter()
            .map(|(instance, report)| (instance, report.universe()))
            .collect();

        let agents: Vec<UniverseCoverage> = group
            .agents
            .iter()
            .map(|(agent, record)| {
                let tests_available: u64 = record
                    .reports
                    .values()
                    .map(|report| report.universe().len() as u64)
                    .sum();

                let mut solved_any = 0usize;
                let mut solved_half = 0usize;
                let mut solved_all = 0usize;
                for (instance, gold_tests) in &gold_universe {
                    if gold_tests.is_empty() {
                        continue;
                    }
                    let resolved = record.resolved(instance);
                    let resolved_len = resolved.map_or(0, BTreeSet::len);
                    if resolved_len > 0 {
                        solved_any += 1;
                    }
                    if resolved_len * 2 >= gold_tests.len() {
                        solved_half += 1;
                    }
                    if resolved.is_some_and(|tests| tests == gold_tests) {
                        solved_all += 1;
                    }
                }

                UniverseCoverage {
                    agent: agent.clone(),
                    meaningful_solved: index.agent_total(agent),
                    tests_available,
                    solved_any,
                    solved_half,
                    solved_all,
                }
            })
            .collect();

        Ok(CoverageReport {
            source: group.source.clone(),
            meaningful_total: MeaningfulDeriver::total(meaningful),
            gold_instances: gold_universe.len(),
            agents,
        })
    }

    /// Confusion-matrix comparison of meaningful-test predictions against
    /// real benchmark outcomes.
    ///
    /// Agents absent from `real_results` are left out; the caller decides
    /// how loudly to report them.
    pub fn correlate(
        group: &EvalGroup,
        meaningful: &MeaningfulMap,
        real_results: &BTreeMap<String, BTreeSet<String>>,
        strict: bool,
    ) -> Result<CorrelationReport, EvalError> {
        if group.agents.is_empty() {
            return Err(EvalError::NoAgentRuns {
                source: group.source.clone(),
            });
        }
        if meaningful.is_empty() {
            return Err(EvalError::NoMeaningfulTests {
                source: group.source.clone(),
            });
        }

        let mut agents: Vec<CorrelationStats> = Vec::new();
        let mut total_tp = 0u64;
        let mut total_fp = 0u64;
        let mut total_fn = 0u64;
        for (agent, record) in &group.agents {
            let Some(real) = real_results.get(agent) else {
                continue;
            };
            let mut stats = CorrelationStats {
                agent: agent.clone(),
                true_positives: 0,
                false_positives: 0,
                false_negatives: 0,
                true_negatives: 0,
            };
            for (instance, needed) in meaningful {
                let hits = record
                    .resolved(instance)
                    .map_or(0, |resolved| resolved.intersection(needed).count());
                let predicted = if strict { hits == needed.len() } else { hits > 0 };
                let actual = real.contains(instance);
                match (predicted, actual) {
                    (true, true) => stats.true_positives += 1,
                    (true, false) => stats.false_positives += 1,
                    (false, true) => stats.false_negatives += 1,
                    (false, false) => stats.true_negatives += 1,
                }
            }
            total_tp += stats.true_positives;
            total_fp += stats.false_positives;
            total_fn += stats.false_negatives;
            agents.push(stats);
        }
        agents.sort_by(|a, b| {
            b.f1()
                .partial_cmp(&a.f1())
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.agent.cmp(&b.agent))
        });

        Ok(CorrelationReport {
            source: group.source.clone(),
            strict,
            agents,
            aggregate_precision: ratio(total_tp, total_tp + total_fp),
            aggregate_recall: ratio(total_tp, total_tp + total_fn),
        })
    }
}

fn ensure_scorable(
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
