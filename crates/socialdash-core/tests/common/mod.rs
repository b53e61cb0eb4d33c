#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use socialdash_core::merge::{merge, CanonicalDataset, NormalizedSource};
use socialdash_core::types::CanonicalRecord;
use socialdash_core::{Platform, SourceId};

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../socialdash-parser/tests/data")
        .join(name)
}

/// A record on `platform` created at noon UTC on 2024-03-`day`, or undated
/// when `day` is `None`.
pub fn record(
    platform: Platform,
    post_id: &str,
    day: Option<u32>,
    likes: u64,
    replies: u64,
) -> CanonicalRecord {
    CanonicalRecord {
        post_id: Some(post_id.to_string()),
        comment_id: None,
        platform,
        subtype: "photo".to_string(),
        date_created: day.map(|d| Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0).unwrap()),
        num_likes: likes,
        num_replies: replies,
        video_length: 0.0,
        comment_text: String::new(),
        user_url: String::new(),
        post_url: format!("https://example.com/{post_id}"),
    }
}

pub fn with_subtype(mut record: CanonicalRecord, subtype: &str) -> CanonicalRecord {
    record.subtype = subtype.to_string();
    record
}

pub fn with_comment(mut record: CanonicalRecord, comment_id: &str) -> CanonicalRecord {
    record.comment_id = Some(comment_id.to_string());
    record
}

pub fn dataset(records: Vec<CanonicalRecord>) -> CanonicalDataset {
    let mut source = NormalizedSource::empty(SourceId::parse("memory.csv"));
    source.records = records;
    merge(vec![source])
}
