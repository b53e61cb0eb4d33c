use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use socialdash_core::aggregates::{DashboardSummary, SeriesPoint};
use socialdash_core::filters::ViewStatus;
use socialdash_core::ingestion::{IngestionReport, SourceStatus};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn sources_table(report: &IngestionReport) -> Table {
    let mut table = new_table(vec!["Source", "Platform", "Status", "Rows", "Detail"]);
    for source in &report.sources {
        let status = match source.status {
            SourceStatus::Loaded => "loaded",
            SourceStatus::Unavailable => "unavailable",
        };
        let detail = match (&source.message, &source.stats) {
            (Some(message), _) => message.clone(),
            (None, Some(stats)) if stats.has_fallbacks() => format!(
                "{} missing dates, {} unparsable dates",
                stats.missing_dates, stats.unparsable_dates
            ),
            _ => String::new(),
        };
        table.add_row(vec![
            source.source.clone(),
            source.platform.to_string(),
            status.to_string(),
            source.rows.to_string(),
            detail,
        ]);
    }
    table
}

pub fn status_message(status: ViewStatus) -> Option<&'static str> {
    match status {
        ViewStatus::NoData => Some("No data loaded: every source was unavailable or empty."),
        ViewStatus::FilteredOut => Some("No data available for selected filters."),
        ViewStatus::Populated => None,
    }
}

fn series_table(label: &str, points: &[SeriesPoint]) -> Table {
    let mut table = new_table(vec!["Platform", "Day", label]);
    for point in points {
        table.add_row(vec![
            point.platform.to_string(),
            point.day.to_string(),
            point.value.to_string(),
        ]);
    }
    table
}

/// Renders every section of the summary, one table per section.
pub fn summary_tables(summary: &DashboardSummary) -> Vec<(&'static str, Table)> {
    let mut kpis = new_table(vec!["Metric", "Value"]);
    kpis.add_row(vec!["Total Posts".to_string(), summary.kpis.total_posts.to_string()]);
    kpis.add_row(vec!["Total Likes".to_string(), summary.kpis.total_likes.to_string()]);
    kpis.add_row(vec!["Total Comments".to_string(), summary.kpis.total_comments.to_string()]);
    kpis.add_row(vec![
        "Avg Engagement / Post".to_string(),
        format!("{:.2}", summary.kpis.avg_engagement_per_post),
    ]);
    kpis.add_row(vec![
        "Rows in view".to_string(),
        format!("{} of {}", summary.view_rows, summary.dataset_rows),
    ]);

    let mut top = new_table(vec!["Rank", "Post", "Platform", "Engagement", "URL"]);
    for (rank, post) in summary.top_posts.iter().enumerate() {
        top.add_row(vec![
            (rank + 1).to_string(),
            post.post_id.clone(),
            post.platform.to_string(),
            post.engagement.to_string(),
            post.post_url.clone(),
        ]);
    }

    let mut subtypes = new_table(vec!["Post Type", "Engagement"]);
    for row in &summary.engagement_by_subtype {
        subtypes.add_row(vec![row.subtype.clone(), row.engagement.to_string()]);
    }

    vec![
        ("Key metrics", kpis),
        ("Posts per day", series_table("Posts", &summary.daily_posts)),
        ("Likes per day", series_table("Likes", &summary.daily_likes)),
        ("Top posts by engagement", top),
        ("Engagement by post type", subtypes),
    ]
}
