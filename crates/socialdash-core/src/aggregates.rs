//! Dashboard metrics over a filtered view. Every function is pure and has a
//! defined result on an empty view.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use socialdash_parser::Platform;

use crate::filters::{ExclusionCounts, FilteredView, ViewStatus};

pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Kpis {
    pub total_posts: usize,
    pub total_likes: u64,
    pub total_comments: usize,
    pub avg_engagement_per_post: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyMetric {
    /// Rows carrying a post id.
    Posts,
    /// Summed likes.
    Likes,
}

impl DailyMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            DailyMetric::Posts => "num_posts",
            DailyMetric::Likes => "num_likes",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub platform: Platform,
    pub day: NaiveDate,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopPost {
    pub post_id: String,
    pub platform: Platform,
    pub post_url: String,
    pub engagement: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtypeEngagement {
    pub subtype: String,
    pub engagement: u64,
}

/// Sums saturate at `u64::MAX` instead of overflowing.
fn add_to(total: &mut u64, value: u64) {
    *total = total.saturating_add(value);
}

/// Distinct non-null post ids.
pub fn total_posts(view: &FilteredView<'_>) -> usize {
    view.iter()
        .filter_map(|record| record.post_id.as_deref())
        .collect::<HashSet<_>>()
        .len()
}

pub fn total_likes(view: &FilteredView<'_>) -> u64 {
    view.iter()
        .map(|record| record.num_likes)
        .fold(0, u64::saturating_add)
}

/// Distinct non-null comment ids.
pub fn total_comments(view: &FilteredView<'_>) -> usize {
    view.iter()
        .filter_map(|record| record.comment_id.as_deref())
        .collect::<HashSet<_>>()
        .len()
}

/// Mean over posts of each post's summed engagement. Rows without a post id
/// do not form a group. Zero when there are no groups.
pub fn avg_engagement_per_post(view: &FilteredView<'_>) -> f64 {
    let mut per_post: HashMap<&str, u64> = HashMap::new();
    for record in view.iter() {
        if let Some(post_id) = record.post_id.as_deref() {
            add_to(per_post.entry(post_id).or_insert(0), record.engagement());
        }
    }

    if per_post.is_empty() {
        return 0.0;
    }
    let total = per_post.values().fold(0u64, |acc, v| acc.saturating_add(*v));
    total as f64 / per_post.len() as f64
}

pub fn kpis(view: &FilteredView<'_>) -> Kpis {
    Kpis {
        total_posts: total_posts(view),
        total_likes: total_likes(view),
        total_comments: total_comments(view),
        avg_engagement_per_post: avg_engagement_per_post(view),
    }
}

/// One point per (platform, day) that has rows, ordered by platform then day.
/// Days without rows are omitted and undated rows never appear.
pub fn daily_series(view: &FilteredView<'_>, metric: DailyMetric) -> Vec<SeriesPoint> {
    let mut buckets: BTreeMap<(Platform, NaiveDate), u64> = BTreeMap::new();

    for record in view.iter() {
        let Some(day) = record.created_day() else {
            continue;
        };
        let contribution = match metric {
            DailyMetric::Posts => u64::from(record.post_id.is_some()),
            DailyMetric::Likes => record.num_likes,
        };
        add_to(buckets.entry((record.platform, day)).or_insert(0), contribution);
    }

    buckets
        .into_iter()
        .map(|((platform, day), value)| SeriesPoint {
            platform,
            day,
            value,
        })
        .collect()
}

/// Posts ranked by summed engagement, grouped by (post id, platform, url).
/// Ties go to the smaller post id. Rows without a post id are not ranked.
pub fn top_posts(view: &FilteredView<'_>, n: usize) -> Vec<TopPost> {
    let mut groups: HashMap<(&str, Platform, &str), u64> = HashMap::new();
    for record in view.iter() {
        if let Some(post_id) = record.post_id.as_deref() {
            let key = (post_id, record.platform, record.post_url.as_str());
            add_to(groups.entry(key).or_insert(0), record.engagement());
        }
    }

    let mut ranked: Vec<TopPost> = groups
        .into_iter()
        .map(|((post_id, platform, post_url), engagement)| TopPost {
            post_id: post_id.to_string(),
            platform,
            post_url: post_url.to_string(),
            engagement,
        })
        .collect();

    ranked.sort_by(compare_top_posts);
    ranked.truncate(n);
    ranked
}

fn compare_top_posts(a: &TopPost, b: &TopPost) -> Ordering {
    b.engagement
        .cmp(&a.engagement)
        .then_with(|| a.post_id.cmp(&b.post_id))
        .then_with(|| a.platform.cmp(&b.platform))
        .then_with(|| a.post_url.cmp(&b.post_url))
}

/// Summed engagement per subtype, ordered by subtype.
pub fn engagement_by_subtype(view: &FilteredView<'_>) -> Vec<SubtypeEngagement> {
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    for record in view.iter() {
        add_to(totals.entry(record.subtype.as_str()).or_insert(0), record.engagement());
    }

    totals
        .into_iter()
        .map(|(subtype, engagement)| SubtypeEngagement {
            subtype: subtype.to_string(),
            engagement,
        })
        .collect()
}

/// Everything a dashboard page shows for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub dataset_rows: usize,
    pub view_rows: usize,
    pub status: ViewStatus,
    pub excluded: ExclusionCounts,
    pub kpis: Kpis,
    pub daily_posts: Vec<SeriesPoint>,
    pub daily_likes: Vec<SeriesPoint>,
    pub top_posts: Vec<TopPost>,
    pub engagement_by_subtype: Vec<SubtypeEngagement>,
}

impl DashboardSummary {
    pub fn compute(view: &FilteredView<'_>, top_n: usize) -> Self {
        Self {
            dataset_rows: view.dataset_len(),
            view_rows: view.len(),
            status: view.status(),
            excluded: view.excluded(),
            kpis: kpis(view),
            daily_posts: daily_series(view, DailyMetric::Posts),
            daily_likes: daily_series(view, DailyMetric::Likes),
            top_posts: top_posts(view, top_n),
            engagement_by_subtype: engagement_by_subtype(view),
        }
    }
}
