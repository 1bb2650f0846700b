//! Configuration models with serde-backed defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_solutions_dir() -> PathBuf {
    PathBuf::from("solutions")
}

fn default_scores_path() -> PathBuf {
    PathBuf::from("scores.json")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_real_results_dir() -> PathBuf {
    PathBuf::from("filtered_results")
}

fn default_seed() -> u64 {
    42
}

fn default_output_label() -> String {
    "Agent_Selection_v1".to_string()
}

fn default_hard_test_threshold() -> f64 {
    0.2
}

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerdictConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Filesystem locations for inputs and outputs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory of result report files
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// Directory of per-agent solution JSONL files
    #[serde(default = "default_solutions_dir")]
    pub solutions_dir: PathBuf,

    /// External score table used for tie-breaking
    #[serde(default = "default_scores_path")]
    pub scores_path: PathBuf,

    /// Root for metadata/ and chosen/ outputs
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Directory of real benchmark outcome files (`results_<agent>.json`)
    #[serde(default = "default_real_results_dir")]
    pub real_results_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            solutions_dir: default_solutions_dir(),
            scores_path: default_scores_path(),
            output_dir: default_output_dir(),
            real_results_dir: default_real_results_dir(),
        }
    }
}

/// Selection engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Seed for the per-group tie-breaking RNG
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Value stamped into `model_name_or_path` on chosen payloads
    #[serde(default = "default_output_label")]
    pub output_label: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            output_label: default_output_label(),
        }
    }
}

/// Analyzer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Solve-rate fraction below which a test counts as hard (0, 1]
    #[serde(default = "default_hard_test_threshold")]
    pub hard_test_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            hard_test_threshold: default_hard_test_threshold(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VerdictConfig::default();
        assert_eq!(config.paths.results_dir, PathBuf::from("results"));
        assert_eq!(config.paths.scores_path, PathBuf::from("scores.json"));
        assert_eq!(config.paths.real_results_dir, PathBuf::from("filtered_results"));
        assert_eq!(config.selection.seed, 42);
        assert_eq!(config.selection.output_label, "Agent_Selection_v1");
        assert!((config.analysis.hard_test_threshold - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: VerdictConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.paths.output_dir, PathBuf::from("output"));
        assert_eq!(config.selection.seed, 42);
    }

    #[test]
    fn test_partial_yaml_overrides_one_section() {
        let yaml = "selection:\n  seed: 7\n";
        let config: VerdictConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.selection.seed, 7);
        assert_eq!(config.selection.output_label, "Agent_Selection_v1");
        assert_eq!(config.paths.results_dir, PathBuf::from("results"));
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = VerdictConfig::default();
        config.paths.results_dir = PathBuf::from("/data/results");
        config.analysis.hard_test_threshold = 0.1;
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: VerdictConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.paths.results_dir, PathBuf::from("/data/results"));
        assert!((parsed.analysis.hard_test_threshold - 0.1).abs() < f64::EPSILON);
    }
}
