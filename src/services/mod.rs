//! Service layer: the evaluation and selection algorithms.
//!
//! Services are pure computations over domain models. They never touch the
//! filesystem; the infrastructure stores feed them and persist their output.

pub mod coverage;
pub mod matching;
pub mod meaningful;
pub mod oracle;
pub mod selection;
pub mod summary;

pub use coverage::CoverageIndex;
pub use matching::AgentMatcher;
pub use meaningful::MeaningfulDeriver;
pub use oracle::OracleAnalyzer;
pub use selection::SelectionEngine;
pub use summary::SummaryService;
