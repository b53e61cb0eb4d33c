//! Field-level coercion. Every helper returns `None` for blank or unusable
//! input and leaves the default policy to the caller.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

static NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

static DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

fn is_missing(trimmed: &str) -> bool {
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
        || trimmed.eq_ignore_ascii_case("nat")
}

/// Parses a creation timestamp. RFC 3339 (fractional seconds, `Z` or offset)
/// first, then naive date-times and bare dates taken as UTC midnight, then
/// integer Unix seconds.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if is_missing(trimmed) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    // "2024-01-05 10:00:00Z" and friends: rfc3339 insists on the `T`.
    if let Some(stripped) = trimmed.strip_suffix('Z').or_else(|| trimmed.strip_suffix('z')) {
        if let Some(dt) = parse_naive(stripped) {
            return Some(dt.and_utc());
        }
    }

    if let Some(dt) = parse_naive(trimmed) {
        return Some(dt.and_utc());
    }

    // Bare years such as "2024" are not epochs.
    if trimmed.len() >= 9 {
        if let Ok(seconds) = trimmed.parse::<i64>() {
            return DateTime::<Utc>::from_timestamp(seconds, 0);
        }
    }

    None
}

fn parse_naive(value: &str) -> Option<NaiveDateTime> {
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Parses a non-negative engagement count. Accepts integers, floats written by
/// spreadsheet exports (`"12.0"`, rounded) and thousands separators.
pub fn parse_count(value: &str) -> Option<u64> {
    let trimmed = value.trim();
    if is_missing(trimmed) {
        return None;
    }
    let cleaned: String = trimmed.chars().filter(|c| *c != ',' && *c != '_').collect();
    if let Ok(parsed) = cleaned.parse::<u64>() {
        return Some(parsed);
    }
    match cleaned.parse::<f64>() {
        // Floats at or past 2^64 do not fit and are rejected, not clamped.
        Ok(parsed) if parsed.is_finite() && parsed >= 0.0 && parsed < u64::MAX as f64 => {
            Some(parsed.round() as u64)
        }
        _ => None,
    }
}

/// Parses a non-negative finite float such as a video length in seconds.
pub fn parse_non_negative_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if is_missing(trimmed) {
        return None;
    }
    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() && parsed >= 0.0 => Some(parsed),
        _ => None,
    }
}

/// Trims an identifier cell; blanks and NaN markers are absent.
pub fn clean_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !is_missing(v))
        .map(|v| v.to_string())
}

/// Text cells keep their content; only missing markers collapse to empty.
pub fn clean_text(value: Option<&str>) -> String {
    match value {
        Some(text) if !is_missing(text.trim()) => text.to_string(),
        _ => String::new(),
    }
}
