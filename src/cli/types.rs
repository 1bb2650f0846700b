//! Clap argument and subcommand definitions for the verdict CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "verdict")]
#[command(about = "Benchmark evaluation and per-instance agent selection", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Config file to use instead of the .verdict/ hierarchy
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analysis reports over a results directory
    #[command(subcommand)]
    Analyze(AnalyzeCommands),

    /// Pick the best agent per instance and emit selection outputs
    Select(SelectArgs),

    /// Derive and persist meaningful-test maps
    #[command(subcommand)]
    Meaningful(MeaningfulCommands),

    /// Curate real benchmark result files
    #[command(subcommand)]
    Results(ResultsCommands),

    /// Filter solution sets against instance catalogues
    #[command(subcommand)]
    Solutions(SolutionsCommands),
}

/// Arguments shared by every analyze subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Results directory (overrides configuration)
    #[arg(short, long)]
    pub results: Option<PathBuf>,

    /// Restrict analysis to one test-generation source
    #[arg(long)]
    pub only: Option<String>,
}

#[derive(Subcommand)]
pub enum AnalyzeCommands {
    /// Per-agent meaningful-test solve summary
    Summary(AnalyzeArgs),

    /// Coverage of each agent against the gold test universe
    Coverage(AnalyzeArgs),

    /// Best-single, oracle, and ensemble scores
    Oracle(OracleArgs),

    /// Pairwise complementarity, specialists, hard tests, regressions
    Ensemble(EnsembleArgs),

    /// Correlate meaningful-test coverage with real benchmark outcomes
    Correlation(CorrelationArgs),
}

#[derive(Args, Debug)]
pub struct OracleArgs {
    #[command(flatten)]
    pub common: AnalyzeArgs,

    /// Include the per-instance routing table
    #[arg(short, long)]
    pub detail: bool,
}

#[derive(Args, Debug)]
pub struct EnsembleArgs {
    #[command(flatten)]
    pub common: AnalyzeArgs,

    /// Solve-rate fraction below which a test counts as hard, within (0, 1]
    #[arg(long)]
    pub hard_threshold: Option<f64>,
}

#[derive(Args, Debug)]
pub struct CorrelationArgs {
    #[command(flatten)]
    pub common: AnalyzeArgs,

    /// Directory of real results files (overrides configuration)
    #[arg(long)]
    pub real_results: Option<PathBuf>,

    /// Predict success only when the full meaningful set is covered
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Results directory (overrides configuration)
    #[arg(short, long)]
    pub results: Option<PathBuf>,

    /// Seed for per-group tie-break randomness
    #[arg(long)]
    pub seed: Option<u64>,

    /// Label stamped into chosen payloads as model_name_or_path
    #[arg(long)]
    pub label: Option<String>,

    /// Score table for tie-breaking (overrides configuration)
    #[arg(long)]
    pub scores: Option<PathBuf>,

    /// Directory of per-agent solution JSONL files (overrides configuration)
    #[arg(long)]
    pub solutions: Option<PathBuf>,

    /// Output directory for metadata/ and chosen/ (overrides configuration)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Process only this test-generation source
    #[arg(long)]
    pub only: Option<String>,
}

#[derive(Subcommand)]
pub enum MeaningfulCommands {
    /// Write meaningful_<source>.json per baseline pair plus the union
    Save(MeaningfulSaveArgs),

    /// List saved meaningful files with their instance counts
    Count(MeaningfulCountArgs),
}

#[derive(Args, Debug)]
pub struct MeaningfulSaveArgs {
    /// Results directory (overrides configuration)
    #[arg(short, long)]
    pub results: Option<PathBuf>,

    /// Output directory (defaults to <results>/meaningful_tests)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct MeaningfulCountArgs {
    /// Directory of saved meaningful files (defaults to <results>/meaningful_tests)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum ResultsCommands {
    /// Copy scraped results files whose names match local agents
    Filter(ResultsFilterArgs),
}

#[derive(Args, Debug)]
pub struct ResultsFilterArgs {
    /// Directory of scraped results_<name>.json files
    #[arg(short, long)]
    pub scraped: PathBuf,

    /// Results directory whose agent names drive matching (overrides configuration)
    #[arg(short, long)]
    pub results: Option<PathBuf>,

    /// Destination directory (defaults to the configured real-results directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum SolutionsCommands {
    /// Keep only solutions whose instance appears in every catalogue
    Filter(SolutionsFilterArgs),
}

#[derive(Args, Debug)]
pub struct SolutionsFilterArgs {
    /// Catalogue files; the valid set is their intersection
    #[arg(long, required = true, num_args = 1..)]
    pub catalog: Vec<PathBuf>,

    /// Directory of solution JSONL files (overrides configuration)
    #[arg(long)]
    pub solutions: Option<PathBuf>,

    /// Destination directory for filtered files
    #[arg(short, long)]
    pub output: PathBuf,
}
