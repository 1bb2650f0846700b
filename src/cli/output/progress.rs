//! Progress reporting for long-running commands.
//!
//! The selection run gets a per-group bar; the derive/filter commands get a
//! spinner. Everything draws on stderr so piped stdout stays clean JSON.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

const GROUP_BAR_TEMPLATE: &str = "{bar:32.green/238} {pos}/{len} {msg} [{elapsed}]";
const GROUP_BAR_CHARS: &str = "=> ";
const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg} ({elapsed})";
const TICK_MILLIS: u64 = 120;

/// Progress bar sized to the number of groups or files to process.
///
/// # Example
/// ```
/// use verdict::cli::output::progress::create_progress_bar;
///
/// let pb = create_progress_bar(3);
/// for source in ["gen-a", "gen-b", "gen-c"] {
///     pb.set_message(format!("Selecting for {source}"));
///     // run the cascade
///     pb.inc(1);
/// }
/// pb.finish_with_message("Done");
/// ```
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(GROUP_BAR_TEMPLATE)
            .expect("Invalid progress bar template")
            .progress_chars(GROUP_BAR_CHARS),
    );
    pb.enable_steady_tick(Duration::from_millis(TICK_MILLIS));
    pb
}

/// Spinner for work with no known total.
pub fn create_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template(SPINNER_TEMPLATE)
            .expect("Invalid progress bar template"),
    );
    spinner.enable_steady_tick(Duration::from_millis(TICK_MILLIS));
    spinner
}

/// Spinner that starts with its message already set.
pub fn create_spinner_with_message(message: impl Into<String>) -> ProgressBar {
    let spinner = create_spinner();
    spinner.set_message(message.into());
    spinner
}

/// Outcome-aware finishing for bars and spinners.
///
/// The finished line stays on screen, so the glyph tells the reader how the
/// step ended without scrolling back through warnings.
pub trait ProgressBarExt {
    fn finish_success(&self, message: impl Into<String>);

    fn finish_error(&self, message: impl Into<String>);

    fn finish_warning(&self, message: impl Into<String>);
}

impl ProgressBarExt for ProgressBar {
    fn finish_success(&self, message: impl Into<String>) {
        let mark = style("ok").green().for_stderr();
        self.finish_with_message(format!("{mark} {}", message.into()));
    }

    fn finish_error(&self, message: impl Into<String>) {
        let mark = style("failed").red().for_stderr();
        self.finish_with_message(format!("{mark} {}", message.into()));
    }

    fn finish_warning(&self, message: impl Into<String>) {
        let mark = style("warn").yellow().for_stderr();
        self.finish_with_message(format!("{mark} {}", message.into()));
    }
}
