use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use socialdash_core::config::{DashboardConfig, CONFIG_ENV_VAR};
use socialdash_core::SourceId;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

use commands::export::{handle_export, ExportArgs};
use commands::sources::{handle_sources, SourcesArgs};
use commands::summary::{handle_summary, SummaryArgs};

const DEFAULT_CONFIG_FILE: &str = "socialdash.toml";

#[derive(Parser, Debug)]
#[command(author, version, about = "Social media engagement dashboard CLI", long_about = None)]
struct Cli {
    /// TOML configuration file (defaults to ./socialdash.toml when present)
    #[arg(long, global = true, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Extra source path or URL, read after the configured ones
    #[arg(long = "source", global = true)]
    sources: Vec<String>,

    /// Directory to search for CSV sources, overriding the configuration
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List resolved sources and whether they could be read
    Sources(SourcesArgs),
    /// Print KPIs, daily series, top posts and engagement by post type
    Summary(SummaryArgs),
    /// Write the filtered records to a CSV or Parquet file
    Export(ExportArgs),
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(dir) = cli.dir {
        // Relative to the working directory, not the configuration file.
        let cwd = std::env::current_dir().context("failed to read working directory")?;
        config.sources.discover_dir = Some(cwd.join(dir));
    }
    let extra: Vec<SourceId> = cli.sources.iter().map(|s| SourceId::parse(s)).collect();

    match cli.command {
        Command::Sources(args) => handle_sources(&config, &extra, args),
        Command::Summary(args) => handle_summary(&config, &extra, args),
        Command::Export(args) => handle_export(&config, &extra, args),
    }
}

fn init_tracing(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(explicit: Option<&Path>) -> Result<DashboardConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !fallback.is_file() {
                info!("No configuration file found, using defaults");
                return Ok(DashboardConfig::default());
            }
            fallback
        }
    };

    let config = DashboardConfig::load(&path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    info!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "socialdash",
            "summary",
            "--platform",
            "tiktok",
            "--source",
            "a.csv",
            "--source",
            "https://example.com/b.csv",
            "--top",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.sources, vec!["a.csv", "https://example.com/b.csv"]);
        match cli.command {
            Command::Summary(args) => {
                assert_eq!(args.top, Some(3));
                assert_eq!(args.filters.platforms, vec!["tiktok"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn all_dates_conflicts_with_explicit_bounds() {
        let result = Cli::try_parse_from(["socialdash", "export", "--out", "x.csv", "--all-dates", "--from", "2024-03-01"]);
        assert!(result.is_err());
    }
}
