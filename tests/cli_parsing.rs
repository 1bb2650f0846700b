use clap::Parser;
use std::path::PathBuf;
use verdict::cli::types::{
    AnalyzeCommands, MeaningfulCommands, ResultsCommands, SolutionsCommands,
};
use verdict::cli::{Cli, Commands};

#[test]
fn test_parse_analyze_summary_defaults() {
    let cli = Cli::try_parse_from(vec!["verdict", "analyze", "summary"]).unwrap();

    match cli.command {
        Commands::Analyze(command) => match command {
            AnalyzeCommands::Summary(args) => {
                assert!(args.results.is_none());
                assert!(args.only.is_none());
            }
            _ => panic!("Wrong analyze command"),
        },
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_analyze_summary_with_overrides() {
    let cli = Cli::try_parse_from(vec![
        "verdict", "analyze", "summary", "--results", "runs", "--only", "gen-alpha",
    ])
    .unwrap();

    match cli.command {
        Commands::Analyze(AnalyzeCommands::Summary(args)) => {
            assert_eq!(args.results, Some(PathBuf::from("runs")));
            assert_eq!(args.only.as_deref(), Some("gen-alpha"));
        }
        _ => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_analyze_coverage() {
    let cli = Cli::try_parse_from(vec!["verdict", "analyze", "coverage", "-r", "runs"]).unwrap();

    match cli.command {
        Commands::Analyze(AnalyzeCommands::Coverage(args)) => {
            assert_eq!(args.results, Some(PathBuf::from("runs")));
        }
        _ => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_analyze_oracle_detail_flag() {
    let cli = Cli::try_parse_from(vec!["verdict", "analyze", "oracle", "--detail"]).unwrap();

    match cli.command {
        Commands::Analyze(AnalyzeCommands::Oracle(args)) => {
            assert!(args.detail);
            assert!(args.common.results.is_none());
        }
        _ => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_analyze_ensemble_threshold() {
    let cli = Cli::try_parse_from(vec![
        "verdict",
        "analyze",
        "ensemble",
        "--hard-threshold",
        "0.35",
    ])
    .unwrap();

    match cli.command {
        Commands::Analyze(AnalyzeCommands::Ensemble(args)) => {
            assert_eq!(args.hard_threshold, Some(0.35));
        }
        _ => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_analyze_ensemble_threshold_not_a_number() {
    let result = Cli::try_parse_from(vec![
        "verdict",
        "analyze",
        "ensemble",
        "--hard-threshold",
        "hard",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_parse_analyze_correlation_strict() {
    let cli = Cli::try_parse_from(vec![
        "verdict",
        "analyze",
        "correlation",
        "--strict",
        "--real-results",
        "leaderboard",
    ])
    .unwrap();

    match cli.command {
        Commands::Analyze(AnalyzeCommands::Correlation(args)) => {
            assert!(args.strict);
            assert_eq!(args.real_results, Some(PathBuf::from("leaderboard")));
        }
        _ => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_select_defaults() {
    let cli = Cli::try_parse_from(vec!["verdict", "select"]).unwrap();

    match cli.command {
        Commands::Select(args) => {
            assert!(args.results.is_none());
            assert!(args.seed.is_none());
            assert!(args.label.is_none());
            assert!(args.scores.is_none());
            assert!(args.solutions.is_none());
            assert!(args.output.is_none());
            assert!(args.only.is_none());
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_select_with_overrides() {
    let cli = Cli::try_parse_from(vec![
        "verdict",
        "select",
        "--seed",
        "7",
        "--label",
        "Panel_v2",
        "--scores",
        "scores.json",
        "--solutions",
        "sols",
        "-o",
        "out",
        "--only",
        "gen-beta",
    ])
    .unwrap();

    match cli.command {
        Commands::Select(args) => {
            assert_eq!(args.seed, Some(7));
            assert_eq!(args.label.as_deref(), Some("Panel_v2"));
            assert_eq!(args.scores, Some(PathBuf::from("scores.json")));
            assert_eq!(args.solutions, Some(PathBuf::from("sols")));
            assert_eq!(args.output, Some(PathBuf::from("out")));
            assert_eq!(args.only.as_deref(), Some("gen-beta"));
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_meaningful_save() {
    let cli = Cli::try_parse_from(vec![
        "verdict", "meaningful", "save", "-r", "runs", "-o", "derived",
    ])
    .unwrap();

    match cli.command {
        Commands::Meaningful(MeaningfulCommands::Save(args)) => {
            assert_eq!(args.results, Some(PathBuf::from("runs")));
            assert_eq!(args.output, Some(PathBuf::from("derived")));
        }
        _ => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_meaningful_count() {
    let cli = Cli::try_parse_from(vec!["verdict", "meaningful", "count", "-d", "derived"]).unwrap();

    match cli.command {
        Commands::Meaningful(MeaningfulCommands::Count(args)) => {
            assert_eq!(args.dir, Some(PathBuf::from("derived")));
        }
        _ => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_results_filter() {
    let cli = Cli::try_parse_from(vec![
        "verdict", "results", "filter", "--scraped", "scraped", "-o", "curated",
    ])
    .unwrap();

    match cli.command {
        Commands::Results(ResultsCommands::Filter(args)) => {
            assert_eq!(args.scraped, PathBuf::from("scraped"));
            assert_eq!(args.output, Some(PathBuf::from("curated")));
            assert!(args.results.is_none());
        }
        _ => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_results_filter_requires_scraped() {
    let result = Cli::try_parse_from(vec!["verdict", "results", "filter"]);
    assert!(result.is_err());
}

#[test]
fn test_parse_solutions_filter_multiple_catalogs() {
    let cli = Cli::try_parse_from(vec![
        "verdict",
        "solutions",
        "filter",
        "--catalog",
        "lite.json",
        "verified.json",
        "-o",
        "filtered",
    ])
    .unwrap();

    match cli.command {
        Commands::Solutions(SolutionsCommands::Filter(args)) => {
            assert_eq!(
                args.catalog,
                vec![PathBuf::from("lite.json"), PathBuf::from("verified.json")]
            );
            assert_eq!(args.output, PathBuf::from("filtered"));
        }
        _ => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_solutions_filter_requires_catalog() {
    let result = Cli::try_parse_from(vec!["verdict", "solutions", "filter", "-o", "filtered"]);
    assert!(result.is_err());
}

#[test]
fn test_global_options() {
    let cli = Cli::try_parse_from(vec![
        "verdict",
        "--config",
        "/custom/config.yaml",
        "--json",
        "analyze",
        "summary",
    ])
    .unwrap();

    assert_eq!(cli.config, Some(PathBuf::from("/custom/config.yaml")));
    assert!(cli.json);
}

#[test]
fn test_global_options_after_subcommand() {
    let cli = Cli::try_parse_from(vec!["verdict", "analyze", "summary", "--json"]).unwrap();
    assert!(cli.json);
}
