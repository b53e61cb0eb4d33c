use anyhow::Result;
use clap::Args;
use socialdash_core::aggregates::DashboardSummary;
use socialdash_core::config::DashboardConfig;
use socialdash_core::filters::filter;
use socialdash_core::ingestion::run_pipeline;
use socialdash_core::SourceId;
use tracing::info;

use super::{today, FilterArgs};
use crate::render;

#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Number of posts in the engagement ranking (defaults to the configured value)
    #[arg(long)]
    pub top: Option<usize>,

    /// Print the summary as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

pub fn handle_summary(config: &DashboardConfig, extra: &[SourceId], args: SummaryArgs) -> Result<()> {
    let output = run_pipeline(config, extra)?;
    let dataset = output.dataset;

    let selection = args.filters.selection(&dataset, today())?;
    let view = filter(&dataset, &selection);
    let top_n = args.top.unwrap_or(config.dashboard.top_n);
    let summary = DashboardSummary::compute(&view, top_n);
    info!(
        dataset_rows = summary.dataset_rows,
        view_rows = summary.view_rows,
        excluded = summary.excluded.total(),
        "Computed dashboard summary"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if let Some(message) = render::status_message(summary.status) {
        println!("{message}");
        return Ok(());
    }

    for (title, table) in render::summary_tables(&summary) {
        println!("{title}");
        println!("{table}");
    }
    Ok(())
}
