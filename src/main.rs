//! Verdict CLI entry point.

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use verdict::cli::{Cli, Commands};
use verdict::domain::models::VerdictConfig;
use verdict::infrastructure::config::ConfigLoader;

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => verdict::cli::handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Analyze(command) => {
            verdict::cli::commands::analyze::execute(command, &config, cli.json)
        }
        Commands::Select(args) => verdict::cli::commands::select::execute(args, &config, cli.json),
        Commands::Meaningful(command) => {
            verdict::cli::commands::meaningful::execute(command, &config, cli.json)
        }
        Commands::Results(command) => {
            verdict::cli::commands::results::execute(command, &config, cli.json)
        }
        Commands::Solutions(command) => {
            verdict::cli::commands::solutions::execute(command, &config, cli.json)
        }
    };

    if let Err(err) = result {
        verdict::cli::handle_error(err, cli.json);
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<VerdictConfig> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => ConfigLoader::load().context("Failed to load configuration"),
    }
}
