//! Tabular views of the dataset and aggregates for presentation and export.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use polars::prelude::*;

use crate::aggregates::{DailyMetric, SeriesPoint, SubtypeEngagement, TopPost};
use crate::error::Result;
use crate::types::CanonicalRecord;

fn epoch_days(day: NaiveDate) -> i32 {
    day.signed_duration_since(DateTime::<Utc>::UNIX_EPOCH.date_naive())
        .num_days() as i32
}

/// One row per record: the canonical columns plus `platform` and the derived
/// `engagement`. `date_created` is a microsecond datetime (UTC) with nulls.
pub fn records_frame(records: &[&CanonicalRecord]) -> PolarsResult<DataFrame> {
    let post_id: Vec<Option<&str>> = records.iter().map(|r| r.post_id.as_deref()).collect();
    let comment_id: Vec<Option<&str>> = records.iter().map(|r| r.comment_id.as_deref()).collect();
    let platform: Vec<&str> = records.iter().map(|r| r.platform.as_str()).collect();
    let subtype: Vec<&str> = records.iter().map(|r| r.subtype.as_str()).collect();
    let date_created: Vec<Option<i64>> = records
        .iter()
        .map(|r| r.date_created.map(|dt| dt.timestamp_micros()))
        .collect();
    let num_likes: Vec<u64> = records.iter().map(|r| r.num_likes).collect();
    let num_replies: Vec<u64> = records.iter().map(|r| r.num_replies).collect();
    let video_length: Vec<f64> = records.iter().map(|r| r.video_length).collect();
    let comment_text: Vec<&str> = records.iter().map(|r| r.comment_text.as_str()).collect();
    let user_url: Vec<&str> = records.iter().map(|r| r.user_url.as_str()).collect();
    let post_url: Vec<&str> = records.iter().map(|r| r.post_url.as_str()).collect();
    let engagement: Vec<u64> = records.iter().map(|r| r.engagement()).collect();

    let date_series = Series::new("date_created".into(), date_created)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;

    DataFrame::new(vec![
        Series::new("post_id".into(), post_id).into(),
        Series::new("comment_id".into(), comment_id).into(),
        Series::new("platform".into(), platform).into(),
        Series::new("subtype".into(), subtype).into(),
        date_series.into(),
        Series::new("num_likes".into(), num_likes).into(),
        Series::new("num_replies".into(), num_replies).into(),
        Series::new("video_length".into(), video_length).into(),
        Series::new("comment_text".into(), comment_text).into(),
        Series::new("user_url".into(), user_url).into(),
        Series::new("post_url".into(), post_url).into(),
        Series::new("engagement".into(), engagement).into(),
    ])
}

/// Columns `platform`, `date_created` (Date) and the metric's own name.
pub fn daily_series_frame(points: &[SeriesPoint], metric: DailyMetric) -> PolarsResult<DataFrame> {
    let platform: Vec<&str> = points.iter().map(|p| p.platform.as_str()).collect();
    let days: Vec<i32> = points.iter().map(|p| epoch_days(p.day)).collect();
    let values: Vec<u64> = points.iter().map(|p| p.value).collect();

    let day_series = Series::new("date_created".into(), days).cast(&DataType::Date)?;

    DataFrame::new(vec![
        Series::new("platform".into(), platform).into(),
        day_series.into(),
        Series::new(metric.as_str().into(), values).into(),
    ])
}

pub fn top_posts_frame(posts: &[TopPost]) -> PolarsResult<DataFrame> {
    let post_id: Vec<&str> = posts.iter().map(|p| p.post_id.as_str()).collect();
    let platform: Vec<&str> = posts.iter().map(|p| p.platform.as_str()).collect();
    let post_url: Vec<&str> = posts.iter().map(|p| p.post_url.as_str()).collect();
    let engagement: Vec<u64> = posts.iter().map(|p| p.engagement).collect();

    DataFrame::new(vec![
        Series::new("post_id".into(), post_id).into(),
        Series::new("platform".into(), platform).into(),
        Series::new("post_url".into(), post_url).into(),
        Series::new("engagement".into(), engagement).into(),
    ])
}

pub fn engagement_by_subtype_frame(rows: &[SubtypeEngagement]) -> PolarsResult<DataFrame> {
    let subtype: Vec<&str> = rows.iter().map(|r| r.subtype.as_str()).collect();
    let engagement: Vec<u64> = rows.iter().map(|r| r.engagement).collect();

    DataFrame::new(vec![
        Series::new("subtype".into(), subtype).into(),
        Series::new("engagement".into(), engagement).into(),
    ])
}

pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}

pub fn write_parquet(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    ParquetWriter::new(&mut file).finish(df)?;
    Ok(())
}
