//! File-backed stores for every input and output format the system touches.

pub mod catalog;
pub mod meaningful;
pub mod outputs;
pub mod real_results;
pub mod results;
pub mod scores;
pub mod solutions;

pub use catalog::{catalog_intersection, load_instance_catalog};
pub use meaningful::{MeaningfulCount, MeaningfulStore, MeaningfulUnion};
pub use outputs::SelectionOutput;
pub use real_results::{CuratedCopy, RealResultsStore};
pub use results::ResultsStore;
pub use scores::ScoreStore;
pub use solutions::{filter_solutions, FilterStat, SolutionStore, MODEL_NAME_KEY};
