mod common;

use anyhow::Result;
use polars::prelude::*;
use socialdash_core::aggregates::{daily_series, engagement_by_subtype, top_posts, DailyMetric};
use socialdash_core::filters::{filter, FilterSelection};
use socialdash_core::frames::{
    daily_series_frame, engagement_by_subtype_frame, records_frame, top_posts_frame, write_csv,
    write_parquet,
};
use socialdash_core::Platform;

use common::{dataset, record};

#[test]
fn records_frame_has_canonical_columns_and_null_dates() -> Result<()> {
    let data = dataset(vec![
        record(Platform::Facebook, "f1", Some(1), 3, 1),
        record(Platform::TikTok, "t1", None, 2, 2),
    ]);
    let rows: Vec<_> = data.iter().collect();
    let df = records_frame(&rows)?;

    assert_eq!(df.height(), 2);
    assert_eq!(
        df.get_column_names(),
        [
            "post_id",
            "comment_id",
            "platform",
            "subtype",
            "date_created",
            "num_likes",
            "num_replies",
            "video_length",
            "comment_text",
            "user_url",
            "post_url",
            "engagement",
        ]
    );
    assert_eq!(df.column("date_created")?.null_count(), 1);
    assert_eq!(df.column("comment_id")?.null_count(), 2);
    assert_eq!(df.column("platform")?.str()?.get(1), Some("TikTok"));
    assert_eq!(df.column("engagement")?.u64()?.get(0), Some(4));
    Ok(())
}

#[test]
fn aggregate_frames_mirror_aggregates() -> Result<()> {
    let data = dataset(vec![
        record(Platform::Facebook, "f1", Some(1), 3, 1),
        record(Platform::Facebook, "f2", Some(1), 4, 0),
        record(Platform::Instagram, "i1", Some(2), 9, 0),
    ]);
    let selection = FilterSelection::default()
        .with_platforms(Platform::ALL)
        .with_subtypes(["photo"]);
    let view = filter(&data, &selection);

    let likes = daily_series_frame(&daily_series(&view, DailyMetric::Likes), DailyMetric::Likes)?;
    assert_eq!(likes.height(), 2);
    assert_eq!(likes.column("num_likes")?.u64()?.get(0), Some(7));
    assert_eq!(likes.column("date_created")?.dtype(), &DataType::Date);

    let top = top_posts_frame(&top_posts(&view, 2))?;
    assert_eq!(top.height(), 2);
    assert_eq!(top.column("post_id")?.str()?.get(0), Some("i1"));

    let by_subtype = engagement_by_subtype_frame(&engagement_by_subtype(&view))?;
    assert_eq!(by_subtype.column("engagement")?.u64()?.get(0), Some(17));
    Ok(())
}

#[test]
fn frames_export_to_csv_and_parquet() -> Result<()> {
    let data = dataset(vec![record(Platform::Twitter, "t1", Some(3), 1, 1)]);
    let rows: Vec<_> = data.iter().collect();
    let mut df = records_frame(&rows)?;

    let dir = tempfile::tempdir()?;
    let csv_path = dir.path().join("view.csv");
    let parquet_path = dir.path().join("view.parquet");
    write_csv(&mut df, &csv_path)?;
    write_parquet(&mut df, &parquet_path)?;

    let csv_text = std::fs::read_to_string(&csv_path)?;
    assert!(csv_text.starts_with("post_id,comment_id,platform"));
    assert!(csv_text.contains("Twitter"));

    let reread = ParquetReader::new(std::fs::File::open(&parquet_path)?).finish()?;
    assert_eq!(reread.height(), 1);
    Ok(())
}
