//! Command-line interface: argument types, command implementations, and
//! terminal output helpers.

pub mod commands;
pub mod output;
pub mod types;

// Re-export commonly used items
pub use output::progress::{create_progress_bar, create_spinner, ProgressBarExt};
pub use types::{Cli, Commands};

/// Print a top-level error and exit non-zero.
///
/// In JSON mode the error is emitted as a single JSON object so scripted
/// callers never have to parse free-form text.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let payload = serde_json::json!({ "error": format!("{err:#}") });
        eprintln!("{payload}");
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
