//! Meaningful-test derivation.
//!
//! A test is meaningful when it passes with the reference fix applied and
//! fails without it. Everything downstream (coverage, oracle scoring,
//! summaries) measures agents against these sets only.

use std::collections::BTreeSet;

use crate::domain::models::report::{MeaningfulMap, RunRecord};

/// Derives per-instance meaningful-test sets from a group's baselines.
pub struct MeaningfulDeriver;

impl MeaningfulDeriver {
    /// Computes `gold.resolved − none.resolved` per instance.
    ///
    /// Instances absent from the gold baseline contribute nothing; instances
    /// absent from the none baseline keep their full gold-resolved set.
    /// Empty differences are omitted, so every stored set is non-empty.
    pub fn derive(gold: &RunRecord, none: &RunRecord) -> MeaningfulMap {
        let mut meaningful = MeaningfulMap::new();
        for (instance, gold_report) in &gold.reports {
            let diff: BTreeSet<String> = match none.resolved(instance) {
                Some(none_resolved) => gold_report
                    .resolved
                    .difference(none_resolved)
                    .cloned()
                    .collect(),
                None => gold_report.resolved.clone(),
            };
            if !diff.is_empty() {
                meaningful.insert(instance.clone(), diff);
            }
        }
        meaningful
    }

    /// Total meaningful tests across all instances.
    pub fn total(map: &MeaningfulMap) -> u64 {
        map.values().map(|tests| tests.len() as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::models::report::{BaselineKind, ResultRole, TestReport};

    fn baseline(kind: BaselineKind, reports: &[(&str, &[&str])]) -> RunRecord {
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
        RunRecord::new(
            ResultRole::Baseline {
                kind,
                testgen: "gen".to_string(),
            },
            reports,
        )
    }

    #[test]
    fn test_derive_subtracts_none_from_gold() {
        let gold = baseline(BaselineKind::Gold, &[("i1", &["t1", "t2", "t3"])]);
        let none = baseline(BaselineKind::NoFix, &[("i1", &["t2"])]);
        let meaningful = MeaningfulDeriver::derive(&gold, &none);
        let tests: Vec<&str> = meaningful["i1"].iter().map(String::as_str).collect();
        assert_eq!(tests, vec!["t1", "t3"]);
    }

    #[test]
    fn test_instance_missing_from_none_keeps_full_gold_set() {
        let gold = baseline(BaselineKind::Gold, &[("i1", &["t1", "t2"])]);
        let none = baseline(BaselineKind::NoFix, &[]);
        let meaningful = MeaningfulDeriver::derive(&gold, &none);
        assert_eq!(meaningful["i1"].len(), 2);
    }

    #[test]
    fn test_instance_missing_from_gold_is_omitted() {
        let gold = baseline(BaselineKind::Gold, &[]);
        let none = baseline(BaselineKind::NoFix, &[("i1", &["t1"])]);
        assert!(MeaningfulDeriver::derive(&gold, &none).is_empty());
    }

    #[test]
    fn test_identical_baselines_yield_nothing() {
        let gold = baseline(BaselineKind::Gold, &[("i1", &["t1", "t2"])]);
        let none = baseline(BaselineKind::NoFix, &[("i1", &["t1", "t2"])]);
        assert!(MeaningfulDeriver::derive(&gold, &none).is_empty());
    }

    #[test]
    fn test_empty_difference_is_not_stored() {
        let gold = baseline(
            BaselineKind::Gold,
            &[("i1", &["t1"]), ("i2", &["t1", "t2"])],
        );
        let none = baseline(BaselineKind::NoFix, &[("i1", &["t1"]), ("i2", &[])]);
        let meaningful = MeaningfulDeriver::derive(&gold, &none);
        assert!(!meaningful.contains_key("i1"));
        assert_eq!(meaningful["i2"].len(), 2);
        assert_eq!(MeaningfulDeriver::total(&meaningful), 2);
    }

    #[test]
    fn test_tests_passing_in_neither_run_are_excluded() {
        // Resolved sets drive the derivation; unresolved names never leak in.
        let mut gold = baseline(BaselineKind::Gold, &[("i1", &["t1"])]);
        gold.reports
            .get_mut("i1")
            .unwrap()
            .unresolved
            .insert("t9".to_string());
        let none = baseline(BaselineKind::NoFix, &[("i1", &[])]);
        let meaningful = MeaningfulDeriver::derive(&gold, &none);
        assert!(!meaningful["i1"].contains("t9"));
    }
}
