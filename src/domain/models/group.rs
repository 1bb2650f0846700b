//! Evaluation groups: every record sharing one test-generation source.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::error::EvalError;

use super::report::{BaselineKind, ResultRole, RunRecord};

/// True when either source identifier contains the other.
///
/// Harnesses append sweep suffixes (`-500-1` and friends) to the source in
/// agent filenames while baselines keep the bare name, so group membership
/// tolerates containment in both directions.
pub fn sources_match(a: &str, b: &str) -> bool {
    a == b || a.contains(b) || b.contains(a)
}

/// All records for one test-generation source: two baselines plus the agent
/// runs evaluated against it.
#[derive(Debug, Clone)]
pub struct EvalGroup {
    /// The agent-side source identifier the group was keyed on.
    pub source: String,
    pub gold: Option<RunRecord>,
    pub none: Option<RunRecord>,
    /// Agent name to its run, ordered lexicographically.
    pub agents: BTreeMap<String, RunRecord>,
}

impl EvalGroup {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            gold: None,
            none: None,
            agents: BTreeMap::new(),
        }
    }

    /// Agent count for this group.
    pub fn n_agents(&self) -> usize {
        self.agents.len()
    }

    /// Union of every instance any agent run reported, in lexicographic order.
    pub fn agent_instances(&self) -> BTreeSet<String> {
        self.agents
            .values()
            .flat_map(|record| record.reports.keys().cloned())
            .collect()
    }

    /// Both baselines, or the error naming the first missing role.
    pub fn require_baselines(&self) -> Result<(&RunRecord, &RunRecord), EvalError> {
        let gold = self.gold.as_ref().ok_or_else(|| EvalError::MissingBaseline {
            source: self.source.clone(),
            role: BaselineKind::Gold,
        })?;
        let none = self.none.as_ref().ok_or_else(|| EvalError::MissingBaseline {
            source: self.source.clone(),
            role: BaselineKind::NoFix,
        })?;
        Ok((gold, none))
    }

    fn baseline_slot(&mut self, kind: BaselineKind) -> &mut Option<RunRecord> {
        match kind {
            BaselineKind::Gold => &mut self.gold,
            BaselineKind::NoFix => &mut self.none,
        }
    }
}

/// Groups records by agent-side source and attaches baselines.
///
/// Groups exist only for sources that have at least one agent run. Baselines
/// attach by exact source match first, then by containment; an occupied slot
/// is never replaced. Ordering is independent of the input order.
pub fn assemble_groups(records: Vec<RunRecord>) -> Vec<EvalGroup> {
    let mut groups: BTreeMap<String, EvalGroup> = BTreeMap::new();
    let mut baselines: Vec<RunRecord> = Vec::new();

    for record in records {
        match record.role.clone() {
            ResultRole::Agent { agent, testgen } => {
                groups
                    .entry(testgen.clone())
                    .or_insert_with(|| EvalGroup::new(testgen))
                    .agents
                    .insert(agent, record);
            }
            ResultRole::Baseline { .. } => baselines.push(record),
        }
    }

    baselines.sort_by(|a, b| a.role.testgen().cmp(b.role.testgen()));

    for group in groups.values_mut() {
        for exact_only in [true, false] {
            for record in &baselines {
                let ResultRole::Baseline { kind, testgen } = &record.role else {
                    continue;
                };
                let matched = if exact_only {
                    testgen == &group.source
                } else {
                    sources_match(testgen, &group.source)
                };
                let slot = group.baseline_slot(*kind);
                if matched && slot.is_none() {
                    *slot = Some(record.clone());
                }
            }
        }
    }

    groups.into_values().collect()
}

/// A gold baseline with its exact-source none partner, if present.
#[derive(Debug, Clone)]
pub struct BaselinePair {
    pub source: String,
    pub gold: RunRecord,
    pub none: Option<RunRecord>,
}

/// Pairs gold and none baselines that share the exact source string.
///
/// Used by meaningful-test persistence, which works directly off baseline
/// files and must not guess across sweep suffixes.
pub fn baseline_pairs(records: &[RunRecord]) -> Vec<BaselinePair> {
    let mut nones: BTreeMap<&str, &RunRecord> = BTreeMap::new();
    for record in records {
        if let ResultRole::Baseline {
            kind: BaselineKind::NoFix,
            testgen,
        } = &record.role
        {
            nones.insert(testgen, record);
        }
    }

    let mut pairs: Vec<BaselinePair> = records
        .iter()
        .filter_map(|record| match &record.role {
            ResultRole::Baseline {
                kind: BaselineKind::Gold,
                testgen,
            } => Some(BaselinePair {
                source: testgen.clone(),
                gold: record.clone(),
                none: nones.get(testgen.as_str()).map(|r| (*r).clone()),
            }),
            _ => None,
        })
        .collect();
    pairs.sort_by(|a, b| a.source.cmp(&b.source));
    pairs
}
