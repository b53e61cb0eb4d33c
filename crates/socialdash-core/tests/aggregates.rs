mod common;

use chrono::NaiveDate;
use socialdash_core::aggregates::{
    avg_engagement_per_post, daily_series, engagement_by_subtype, kpis, top_posts,
    DailyMetric, DashboardSummary, SeriesPoint, DEFAULT_TOP_N,
};
use socialdash_core::filters::{filter, FilterSelection, FilteredView, ViewStatus};
use socialdash_core::merge::CanonicalDataset;
use socialdash_core::types::CanonicalRecord;
use socialdash_core::{CanonicalColumn, Platform, SourceId};

use common::{dataset, record, with_comment, with_subtype};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

fn view_of(records: &[CanonicalRecord]) -> FilteredView<'_> {
    FilteredView::from_records(records.iter().collect(), records.len())
}

#[test]
fn kpis_count_distinct_posts_and_comments() {
    let records = vec![
        with_comment(record(Platform::Facebook, "p1", Some(1), 3, 1), "c1"),
        with_comment(record(Platform::Facebook, "p1", Some(1), 5, 0), "c2"),
        with_comment(record(Platform::Facebook, "p2", Some(2), 12, 4), "c2"),
        record(Platform::Instagram, "p3", None, 0, 2),
    ];
    let summary = kpis(&view_of(&records));

    assert_eq!(summary.total_posts, 3);
    assert_eq!(summary.total_likes, 20);
    assert_eq!(summary.total_comments, 2);
    // Per-post sums: p1 = 9, p2 = 16, p3 = 2.
    assert!((summary.avg_engagement_per_post - 9.0).abs() < 1e-9);
}

#[test]
fn null_ids_are_not_distinct_values() {
    let mut orphan = record(Platform::Twitter, "unused", Some(1), 4, 4);
    orphan.post_id = None;
    let records = vec![orphan, record(Platform::Twitter, "t1", Some(1), 1, 1)];
    let view = view_of(&records);

    let summary = kpis(&view);
    assert_eq!(summary.total_posts, 1);
    assert_eq!(summary.total_comments, 0);
    assert_eq!(summary.total_likes, 5);
    assert!((avg_engagement_per_post(&view) - 2.0).abs() < 1e-9);
}

#[test]
fn empty_view_has_zero_results() {
    let data = CanonicalDataset::empty();
    let view = filter(&data, &FilterSelection::default());

    let summary = kpis(&view);
    assert_eq!(summary.total_posts, 0);
    assert_eq!(summary.total_likes, 0);
    assert_eq!(summary.total_comments, 0);
    assert_eq!(summary.avg_engagement_per_post, 0.0);
    assert!(daily_series(&view, DailyMetric::Posts).is_empty());
    assert!(daily_series(&view, DailyMetric::Likes).is_empty());
    assert!(top_posts(&view, DEFAULT_TOP_N).is_empty());
    assert!(engagement_by_subtype(&view).is_empty());
}

#[test]
fn same_day_same_platform_likes_collapse_into_one_point() {
    let records = vec![
        record(Platform::Facebook, "p1", Some(4), 4, 0),
        record(Platform::Facebook, "p2", Some(4), 6, 0),
    ];
    let series = daily_series(&view_of(&records), DailyMetric::Likes);

    assert_eq!(
        series,
        vec![SeriesPoint {
            platform: Platform::Facebook,
            day: day(4),
            value: 10,
        }]
    );
}

#[test]
fn daily_series_is_sparse_and_ordered() {
    let records = vec![
        record(Platform::Instagram, "i1", Some(9), 1, 0),
        record(Platform::Facebook, "f1", Some(7), 2, 0),
        record(Platform::Facebook, "f2", Some(1), 3, 0),
        record(Platform::Facebook, "f3", Some(1), 4, 0),
        record(Platform::Facebook, "f4", None, 5, 0),
    ];
    let series = daily_series(&view_of(&records), DailyMetric::Posts);

    let points: Vec<(Platform, NaiveDate, u64)> = series
        .iter()
        .map(|p| (p.platform, p.day, p.value))
        .collect();
    assert_eq!(
        points,
        vec![
            (Platform::Facebook, day(1), 2),
            (Platform::Facebook, day(7), 1),
            (Platform::Instagram, day(9), 1),
        ]
    );
}

#[test]
fn daily_posts_skip_rows_without_post_id() {
    let mut comment_only = record(Platform::TikTok, "x", Some(2), 0, 0);
    comment_only.post_id = None;
    let records = vec![comment_only, record(Platform::TikTok, "t1", Some(2), 0, 0)];

    let series = daily_series(&view_of(&records), DailyMetric::Posts);
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].value, 1);
}

#[test]
fn top_posts_sort_by_engagement_with_post_id_tie_break() {
    let records = vec![
        record(Platform::Facebook, "b", Some(1), 5, 0),
        record(Platform::Facebook, "a", Some(1), 5, 0),
        record(Platform::Instagram, "c", Some(1), 20, 1),
        record(Platform::Facebook, "d", Some(1), 1, 0),
        record(Platform::Facebook, "d", Some(2), 1, 0),
    ];
    let ranked = top_posts(&view_of(&records), 3);

    let order: Vec<(&str, u64)> = ranked
        .iter()
        .map(|p| (p.post_id.as_str(), p.engagement))
        .collect();
    assert_eq!(order, vec![("c", 21), ("a", 5), ("b", 5)]);
    assert_eq!(ranked[0].post_url, "https://example.com/c");
    assert_eq!(ranked[0].platform, Platform::Instagram);
}

#[test]
fn top_posts_never_exceeds_n() {
    let records: Vec<CanonicalRecord> = (0..25)
        .map(|i| record(Platform::Twitter, &format!("t{i:02}"), Some(1), i, 0))
        .collect();
    let view = view_of(&records);

    let ranked = top_posts(&view, DEFAULT_TOP_N);
    assert_eq!(ranked.len(), 10);
    assert!(ranked
        .windows(2)
        .all(|pair| pair[0].engagement >= pair[1].engagement));
    assert_eq!(ranked[0].post_id, "t24");
    assert!(top_posts(&view, 0).is_empty());
    assert_eq!(top_posts(&view, 100).len(), 25);
}

#[test]
fn same_post_id_on_two_platforms_ranks_separately() {
    let records = vec![
        record(Platform::Facebook, "p1", Some(1), 2, 0),
        record(Platform::Twitter, "p1", Some(1), 3, 0),
    ];
    let ranked = top_posts(&view_of(&records), 10);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].platform, Platform::Twitter);
}

#[test]
fn engagement_by_subtype_sums_per_subtype() {
    let records = vec![
        with_subtype(record(Platform::Facebook, "p1", Some(1), 3, 1), "video"),
        with_subtype(record(Platform::Facebook, "p2", Some(1), 2, 2), "photo"),
        with_subtype(record(Platform::TikTok, "p3", None, 10, 0), "video"),
    ];
    let totals: Vec<(String, u64)> = engagement_by_subtype(&view_of(&records))
        .into_iter()
        .map(|row| (row.subtype, row.engagement))
        .collect();

    assert_eq!(
        totals,
        vec![("photo".to_string(), 4), ("video".to_string(), 14)]
    );
}

#[test]
fn summary_reports_sizes_and_status() {
    let data = dataset(vec![
        record(Platform::Facebook, "f1", Some(1), 3, 0),
        record(Platform::Instagram, "i1", Some(2), 10, 0),
    ]);
    let selection = FilterSelection::default()
        .with_platforms([Platform::Facebook])
        .with_subtypes(["photo"]);
    let summary = DashboardSummary::compute(&filter(&data, &selection), 5);

    assert_eq!(summary.dataset_rows, 2);
    assert_eq!(summary.view_rows, 1);
    assert_eq!(summary.status, ViewStatus::Populated);
    assert_eq!(summary.kpis.total_likes, 3);
    assert_eq!(summary.daily_likes.len(), 1);
    assert_eq!(summary.top_posts.len(), 1);
    assert_eq!(summary.excluded.platform, 1);

    let json = serde_json::to_value(&summary).expect("serialize summary");
    assert_eq!(json["status"], "populated");
    assert_eq!(json["kpis"]["total_posts"], 1);
}

#[test]
fn huge_counts_saturate_instead_of_overflowing() {
    let records = vec![
        record(Platform::Facebook, "p1", Some(1), u64::MAX, 0),
        record(Platform::Facebook, "p1", Some(1), u64::MAX, 1),
        record(Platform::Facebook, "p2", Some(1), u64::MAX, 0),
    ];
    let view = view_of(&records);

    let summary = kpis(&view);
    assert_eq!(summary.total_likes, u64::MAX);
    assert!(summary.avg_engagement_per_post.is_finite());
    assert!(summary.avg_engagement_per_post > 0.0);

    let likes = daily_series(&view, DailyMetric::Likes);
    assert_eq!(likes.len(), 1);
    assert_eq!(likes[0].value, u64::MAX);

    let ranked = top_posts(&view, DEFAULT_TOP_N);
    assert_eq!(ranked[0].engagement, u64::MAX);
    assert_eq!(engagement_by_subtype(&view)[0].engagement, u64::MAX);
}

#[test]
fn out_of_range_like_counts_from_a_source_do_not_break_kpis() {
    let content = "post_id,subtype,date_created,num_likes\np1,photo,2024-03-01,1e20\np2,photo,2024-03-01,1e20\np3,photo,2024-03-01,18446744073709551615\n";
    let table = socialdash_parser::decode_table("facebook.csv", content, b',').expect("decode");
    let (records, stats) =
        socialdash_core::normalize::normalize_with_stats(&SourceId::parse("facebook.csv"), &table);

    let likes: Vec<u64> = records.iter().map(|r| r.num_likes).collect();
    assert_eq!(likes, vec![0, 0, u64::MAX]);
    assert_eq!(stats.invalid_numbers.get(&CanonicalColumn::NumLikes), Some(&2));

    let data = dataset(records);
    let view = filter(&data, &FilterSelection::everything(&data, day(1)));
    assert_eq!(kpis(&view).total_likes, u64::MAX);
}
