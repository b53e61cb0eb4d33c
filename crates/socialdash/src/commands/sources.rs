use anyhow::Result;
use clap::Args;
use socialdash_core::config::DashboardConfig;
use socialdash_core::ingestion::run_pipeline;
use socialdash_core::SourceId;

use crate::render;

#[derive(Args, Debug)]
pub struct SourcesArgs {
    /// Print the ingestion report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn handle_sources(config: &DashboardConfig, extra: &[SourceId], args: SourcesArgs) -> Result<()> {
    let output = run_pipeline(config, extra)?;
    let report = output.report;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.sources.is_empty() {
        println!("No sources configured. Pass --source, --dir or a configuration file.");
        return Ok(());
    }

    println!("{}", render::sources_table(&report));
    println!(
        "{} loaded, {} unavailable, {} rows in total",
        report.loaded_count(),
        report.unavailable_count(),
        report.total_rows()
    );
    Ok(())
}
