pub mod config;
pub mod group;
pub mod oracle;
pub mod report;
pub mod selection;
pub mod summary;

pub use config::{AnalysisConfig, PathsConfig, SelectionConfig, VerdictConfig};
pub use group::{assemble_groups, baseline_pairs, sources_match, BaselinePair, EvalGroup};
pub use oracle::{
    AgentProfile, AgentRegression, EnsembleReport, InstanceRouting, OracleReport, PairReport,
};
pub use report::{
    BaselineKind, MeaningfulMap, RawDetails, RawInstanceReport, ResultRole, RunRecord, TestReport,
};
pub use selection::{SelectionRecord, SelectionStats, TieStatus};
pub use summary::{
    AgentSummary, CorrelationReport, CorrelationStats, CoverageReport, SummaryReport,
    UniqueContribution, UniverseCoverage,
};
