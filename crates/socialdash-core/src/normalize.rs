use std::collections::BTreeMap;

use serde::Serialize;
use socialdash_parser::fields::{
    clean_optional, clean_text, parse_count, parse_datetime, parse_non_negative_f64,
};
use socialdash_parser::{CanonicalColumn, Platform, RawRecord, RawTable, SourceId, SourceSchema};
use tracing::debug;

use crate::types::CanonicalRecord;

pub const UNKNOWN_SUBTYPE: &str = "Unknown";

/// Field-level fallbacks applied while normalizing one source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    pub rows: usize,
    pub missing_dates: usize,
    pub unparsable_dates: usize,
    pub invalid_numbers: BTreeMap<CanonicalColumn, usize>,
}

impl NormalizeStats {
    pub fn has_fallbacks(&self) -> bool {
        self.unparsable_dates > 0 || !self.invalid_numbers.is_empty()
    }
}

/// Normalizes one source's rows. Output length and order match the input.
pub fn normalize(source: &SourceId, table: &RawTable) -> Vec<CanonicalRecord> {
    normalize_with_stats(source, table).0
}

pub fn normalize_with_stats(
    source: &SourceId,
    table: &RawTable,
) -> (Vec<CanonicalRecord>, NormalizeStats) {
    let platform = Platform::from_source(&source.to_string());
    let mut stats = NormalizeStats {
        rows: table.len(),
        ..NormalizeStats::default()
    };

    let records = table
        .rows
        .iter()
        .map(|row| normalize_row(platform, &table.schema, row, &mut stats))
        .collect();

    if stats.has_fallbacks() {
        debug!(
            source = %source,
            unparsable_dates = stats.unparsable_dates,
            invalid_numbers = ?stats.invalid_numbers,
            "applied field defaults"
        );
    }

    (records, stats)
}

fn normalize_row(
    platform: Platform,
    schema: &SourceSchema,
    row: &RawRecord,
    stats: &mut NormalizeStats,
) -> CanonicalRecord {
    let field = move |column| row.field(schema, column);

    let date_created = match clean_optional(field(CanonicalColumn::DateCreated)) {
        None => {
            stats.missing_dates += 1;
            None
        }
        Some(text) => {
            let parsed = parse_datetime(&text);
            if parsed.is_none() {
                stats.unparsable_dates += 1;
            }
            parsed
        }
    };

    let num_likes = coerce(
        field(CanonicalColumn::NumLikes),
        parse_count,
        CanonicalColumn::NumLikes,
        stats,
    );
    let num_replies = coerce(
        field(CanonicalColumn::NumReplies),
        parse_count,
        CanonicalColumn::NumReplies,
        stats,
    );
    let video_length = coerce(
        field(CanonicalColumn::VideoLength),
        parse_non_negative_f64,
        CanonicalColumn::VideoLength,
        stats,
    );

    CanonicalRecord {
        post_id: clean_optional(field(CanonicalColumn::PostId)),
        comment_id: clean_optional(field(CanonicalColumn::CommentId)),
        platform,
        subtype: clean_optional(field(CanonicalColumn::Subtype))
            .unwrap_or_else(|| UNKNOWN_SUBTYPE.to_string()),
        date_created,
        num_likes,
        num_replies,
        video_length,
        comment_text: clean_text(field(CanonicalColumn::CommentText)),
        user_url: clean_text(field(CanonicalColumn::UserUrl)),
        post_url: clean_text(field(CanonicalColumn::PostUrl)),
    }
}

/// Missing cells and absent columns become the zero value. Present but
/// unusable cells do too, and are counted.
fn coerce<T: Default>(
    raw: Option<&str>,
    parse: fn(&str) -> Option<T>,
    column: CanonicalColumn,
    stats: &mut NormalizeStats,
) -> T {
    let Some(text) = clean_optional(raw) else {
        return T::default();
    };
    match parse(&text) {
        Some(value) => value,
        None => {
            *stats.invalid_numbers.entry(column).or_insert(0) += 1;
            T::default()
        }
    }
}
