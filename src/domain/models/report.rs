//! Result report models: the raw shape written by evaluation harnesses and
//! the normalized form the rest of the system computes on.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Map from instance ID to the set of meaningful tests derived for it.
///
/// Meaningful tests pass with the reference fix applied and fail without it.
/// Instances with an empty set are never stored.
pub type MeaningfulMap = BTreeMap<String, BTreeSet<String>>;

/// Baseline role of a result file within an evaluation group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineKind {
    /// Reference fix applied before running the generated tests.
    Gold,
    /// No fix applied.
    #[serde(rename = "none")]
    NoFix,
}

impl BaselineKind {
    /// Returns the filename prefix / string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::NoFix => "none",
        }
    }
}

impl std::fmt::Display for BaselineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role a result file plays, parsed from its file stem.
///
/// Recognized stems: `gold_<testgen>`, `none_<testgen>`, and
/// `<agent>__<testgen>`. Anything else is not a result file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultRole {
    /// Baseline run for a test-generation source.
    Baseline { kind: BaselineKind, testgen: String },
    /// Agent run against a test-generation source.
    Agent { agent: String, testgen: String },
}

impl ResultRole {
    /// Parses a file stem (basename without `.json`) into its role.
    pub fn from_file_stem(stem: &str) -> Option<Self> {
        if let Some(testgen) = stem.strip_prefix("gold_") {
            return (!testgen.is_empty()).then(|| Self::Baseline {
                kind: BaselineKind::Gold,
                testgen: testgen.to_string(),
            });
        }
        if let Some(testgen) = stem.strip_prefix("none_") {
            return (!testgen.is_empty()).then(|| Self::Baseline {
                kind: BaselineKind::NoFix,
                testgen: testgen.to_string(),
            });
        }
        let (agent, testgen) = stem.split_once("__")?;
        if agent.is_empty() || testgen.is_empty() {
            return None;
        }
        Some(Self::Agent {
            agent: agent.to_string(),
            testgen: testgen.to_string(),
        })
    }

    /// The test-generation source this record belongs to.
    pub fn testgen(&self) -> &str {
        match self {
            Self::Baseline { testgen, .. } | Self::Agent { testgen, .. } => testgen,
        }
    }
}

/// Per-instance entry exactly as written by the harness.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInstanceReport {
    /// Raw resolved-test count; absent means zero.
    #[serde(default)]
    pub n_resolved_tests: u32,
    #[serde(default)]
    pub details: RawDetails,
}

/// Test-name lists inside a raw report entry.
///
/// Harness versions disagree on the key for non-passing tests (`unresolved`
/// vs `failed`); both are accepted and merged during normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDetails {
    #[serde(default)]
    pub resolved: Vec<String>,
    #[serde(default)]
    pub unresolved: Vec<String>,
    #[serde(default)]
    pub failed: Vec<String>,
}

/// Normalized per-instance test report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestReport {
    /// Raw resolved count as reported by the harness.
    pub resolved_count: u32,
    /// Names of passing tests.
    pub resolved: BTreeSet<String>,
    /// Names of non-passing tests.
    pub unresolved: BTreeSet<String>,
}

impl TestReport {
    /// Every test name the report mentions, passing or not.
    pub fn universe(&self) -> BTreeSet<String> {
        self.resolved.union(&self.unresolved).cloned().collect()
    }
}

impl From<RawInstanceReport> for TestReport {
    fn from(raw: RawInstanceReport) -> Self {
        let resolved: BTreeSet<String> = raw.details.resolved.into_iter().collect();
        let mut unresolved: BTreeSet<String> = raw.details.unresolved.into_iter().collect();
        unresolved.extend(raw.details.failed);
        Self {
            resolved_count: raw.n_resolved_tests,
            resolved,
            unresolved,
        }
    }
}

/// One parsed result file: its role plus every instance report it contains.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub role: ResultRole,
    /// Instance ID to normalized report, ordered lexicographically.
    pub reports: BTreeMap<String, TestReport>,
}

impl RunRecord {
    pub fn new(role: ResultRole, reports: BTreeMap<String, TestReport>) -> Self {
        Self { role, reports }
    }

    /// Raw resolved count for an instance, zero when the instance is absent.
    pub fn resolved_count(&self, instance: &str) -> u32 {
        self.reports
            .get(instance)
            .map_or(0, |report| report.resolved_count)
    }

    /// Resolved set for an instance, if the instance was reported.
    pub fn resolved(&self, instance: &str) -> Option<&BTreeSet<String>> {
        self.reports.get(instance).map(|report| &report.resolved)
    }
}
