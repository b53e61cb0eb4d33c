use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use socialdash_parser::Platform;

/// One normalized engagement row. Numeric fields are always present; text
/// fields are empty rather than missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    pub post_id: Option<String>,
    pub comment_id: Option<String>,
    pub platform: Platform,
    pub subtype: String,
    pub date_created: Option<DateTime<Utc>>,
    pub num_likes: u64,
    pub num_replies: u64,
    pub video_length: f64,
    pub comment_text: String,
    pub user_url: String,
    pub post_url: String,
}

impl CanonicalRecord {
    /// Likes plus replies. Computed on demand, never stored.
    pub fn engagement(&self) -> u64 {
        self.num_likes.saturating_add(self.num_replies)
    }

    /// Calendar day of creation in UTC.
    pub fn created_day(&self) -> Option<NaiveDate> {
        self.date_created.map(|dt| dt.date_naive())
    }
}
