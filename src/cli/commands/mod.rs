//! CLI command implementations.

pub mod analyze;
pub mod meaningful;
pub mod results;
pub mod select;
pub mod solutions;
