use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use socialdash_core::config::DashboardConfig;
use socialdash_core::filters::filter;
use socialdash_core::frames::{records_frame, write_csv, write_parquet};
use socialdash_core::ingestion::run_pipeline;
use socialdash_core::SourceId;
use tracing::info;

use super::{today, FilterArgs};
use crate::render;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Parquet,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Destination file
    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,

    #[command(flatten)]
    pub filters: FilterArgs,
}

pub fn handle_export(config: &DashboardConfig, extra: &[SourceId], args: ExportArgs) -> Result<()> {
    let output = run_pipeline(config, extra)?;
    let dataset = output.dataset;

    let selection = args.filters.selection(&dataset, today())?;
    let view = filter(&dataset, &selection);
    if let Some(message) = render::status_message(view.status()) {
        println!("{message}");
    }

    let mut df = records_frame(view.records()).context("failed to build records frame")?;
    match args.format {
        ExportFormat::Csv => write_csv(&mut df, &args.out),
        ExportFormat::Parquet => write_parquet(&mut df, &args.out),
    }
    .with_context(|| format!("failed to write {}", args.out.display()))?;

    info!(path = %args.out.display(), rows = df.height(), "Exported filtered view");
    println!("Wrote {} rows to {}", df.height(), args.out.display());
    Ok(())
}
