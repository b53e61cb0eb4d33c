use std::collections::{BTreeSet, HashMap};
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    Facebook,
    Instagram,
    Twitter,
    TikTok,
    Unknown,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Facebook,
        Platform::Instagram,
        Platform::Twitter,
        Platform::TikTok,
        Platform::Unknown,
    ];

    /// Platforms that can be inferred from a source identifier, in match order.
    const INFERABLE: [(&'static str, Platform); 4] = [
        ("facebook", Platform::Facebook),
        ("instagram", Platform::Instagram),
        ("twitter", Platform::Twitter),
        ("tiktok", Platform::TikTok),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
            Platform::Twitter => "Twitter",
            Platform::TikTok => "TikTok",
            Platform::Unknown => "Unknown",
        }
    }

    /// Classifies a source by case-insensitive substring match on its identifier.
    /// The first platform name found wins; anything else is `Unknown`.
    pub fn from_source(identifier: &str) -> Platform {
        let lower = identifier.to_ascii_lowercase();
        Self::INFERABLE
            .iter()
            .find(|(needle, _)| lower.contains(needle))
            .map(|(_, platform)| *platform)
            .unwrap_or(Platform::Unknown)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Platform {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "facebook" | "fb" => Ok(Platform::Facebook),
            "instagram" | "ig" => Ok(Platform::Instagram),
            "twitter" | "x" => Ok(Platform::Twitter),
            "tiktok" => Ok(Platform::TikTok),
            "unknown" => Ok(Platform::Unknown),
            other => Err(format!("unknown platform '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CanonicalColumn {
    PostId,
    CommentId,
    Subtype,
    DateCreated,
    NumLikes,
    NumReplies,
    VideoLength,
    CommentText,
    UserUrl,
    PostUrl,
}

impl CanonicalColumn {
    pub const ALL: [CanonicalColumn; 10] = [
        CanonicalColumn::PostId,
        CanonicalColumn::CommentId,
        CanonicalColumn::Subtype,
        CanonicalColumn::DateCreated,
        CanonicalColumn::NumLikes,
        CanonicalColumn::NumReplies,
        CanonicalColumn::VideoLength,
        CanonicalColumn::CommentText,
        CanonicalColumn::UserUrl,
        CanonicalColumn::PostUrl,
    ];

    pub fn canonical_name(&self) -> &'static str {
        match self {
            CanonicalColumn::PostId => "post_id",
            CanonicalColumn::CommentId => "comment_id",
            CanonicalColumn::Subtype => "subtype",
            CanonicalColumn::DateCreated => "date_created",
            CanonicalColumn::NumLikes => "num_likes",
            CanonicalColumn::NumReplies => "num_replies",
            CanonicalColumn::VideoLength => "video_length",
            CanonicalColumn::CommentText => "comment_text",
            CanonicalColumn::UserUrl => "user_url",
            CanonicalColumn::PostUrl => "post_url",
        }
    }

    /// Maps a source header onto a canonical column. Matching ignores case and
    /// surrounding whitespace. A `platform` header is not mapped.
    pub fn classify_header(header: &str) -> Option<CanonicalColumn> {
        let key = header.trim().to_ascii_lowercase();
        HEADER_ALIASES.get(key.as_str()).copied()
    }
}

impl fmt::Display for CanonicalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

static HEADER_ALIASES: Lazy<HashMap<&'static str, CanonicalColumn>> = Lazy::new(|| {
    use CanonicalColumn::*;
    HashMap::from([
        ("post_id", PostId),
        ("postid", PostId),
        ("post id", PostId),
        ("comment_id", CommentId),
        ("commentid", CommentId),
        ("subtype", Subtype),
        ("post_type", Subtype),
        ("type", Subtype),
        ("date_created", DateCreated),
        ("created_at", DateCreated),
        ("date", DateCreated),
        ("num_likes", NumLikes),
        ("likes", NumLikes),
        ("like_count", NumLikes),
        ("num_replies", NumReplies),
        ("replies", NumReplies),
        ("reply_count", NumReplies),
        ("video_length", VideoLength),
        ("comment_text", CommentText),
        ("text", CommentText),
        ("user_url", UserUrl),
        ("post_url", PostUrl),
        ("url", PostUrl),
    ])
});

/// The canonical columns one source actually carries, and where.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSchema {
    headers: Vec<String>,
    positions: HashMap<CanonicalColumn, usize>,
}

impl SourceSchema {
    pub fn from_headers<'a, I>(headers: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut schema = SourceSchema::default();
        for (index, header) in headers.into_iter().enumerate() {
            schema.headers.push(header.to_string());
            if let Some(column) = CanonicalColumn::classify_header(header) {
                schema.positions.entry(column).or_insert(index);
            }
        }
        schema
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn position(&self, column: CanonicalColumn) -> Option<usize> {
        self.positions.get(&column).copied()
    }

    pub fn has(&self, column: CanonicalColumn) -> bool {
        self.positions.contains_key(&column)
    }

    pub fn columns(&self) -> BTreeSet<CanonicalColumn> {
        self.positions.keys().copied().collect()
    }

    pub fn missing(&self) -> Vec<CanonicalColumn> {
        CanonicalColumn::ALL
            .iter()
            .copied()
            .filter(|column| !self.has(*column))
            .collect()
    }
}

/// One untyped row, cells aligned with the source header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    cells: Vec<String>,
}

impl RawRecord {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// The raw cell for `column`, or `None` when the source lacks the column.
    pub fn field(&self, schema: &SourceSchema, column: CanonicalColumn) -> Option<&str> {
        schema
            .position(column)
            .and_then(|index| self.cells.get(index))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub schema: SourceSchema,
    pub rows: Vec<RawRecord>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
