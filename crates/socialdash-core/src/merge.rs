use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use socialdash_parser::{CanonicalColumn, Platform, RawTable, SourceId};

use crate::normalize::{normalize_with_stats, NormalizeStats};
use crate::types::CanonicalRecord;

/// One source after normalization, with the columns it actually carried.
#[derive(Debug, Clone)]
pub struct NormalizedSource {
    pub source: SourceId,
    pub platform: Platform,
    pub columns: BTreeSet<CanonicalColumn>,
    pub records: Vec<CanonicalRecord>,
}

impl NormalizedSource {
    pub fn from_table(source: SourceId, table: &RawTable) -> (Self, NormalizeStats) {
        let (records, stats) = normalize_with_stats(&source, table);
        let platform = Platform::from_source(&source.to_string());
        let normalized = Self {
            source,
            platform,
            columns: table.schema.columns(),
            records,
        };
        (normalized, stats)
    }

    /// A source that contributes nothing, e.g. one that could not be read.
    pub fn empty(source: SourceId) -> Self {
        let platform = Platform::from_source(&source.to_string());
        Self {
            source,
            platform,
            columns: BTreeSet::new(),
            records: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceProvenance {
    pub source: String,
    pub platform: Platform,
    pub rows: usize,
    pub columns: BTreeSet<CanonicalColumn>,
}

/// The merged, read-only record set every filter and aggregate runs over.
#[derive(Debug, Clone, Default)]
pub struct CanonicalDataset {
    records: Vec<CanonicalRecord>,
    provenance: Vec<SourceProvenance>,
}

impl CanonicalDataset {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalRecord> {
        self.records.iter()
    }

    pub fn provenance(&self) -> &[SourceProvenance] {
        &self.provenance
    }

    /// Distinct platforms in first-seen order.
    pub fn platforms(&self) -> Vec<Platform> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|record| record.platform)
            .filter(|platform| seen.insert(*platform))
            .collect()
    }

    /// Distinct subtypes in first-seen order.
    pub fn subtypes(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|record| seen.insert(record.subtype.as_str()))
            .map(|record| record.subtype.clone())
            .collect()
    }

    /// Earliest and latest creation day over dated records.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut days = self.records.iter().filter_map(CanonicalRecord::created_day);
        let first = days.next()?;
        Some(days.fold((first, first), |(min, max), day| {
            (min.min(day), max.max(day))
        }))
    }

    /// Whether any source for `platform` carried `column`. Lets callers tell
    /// "not tracked" apart from a genuine zero.
    pub fn tracks_column(&self, platform: Platform, column: CanonicalColumn) -> bool {
        self.provenance
            .iter()
            .any(|source| source.platform == platform && source.columns.contains(&column))
    }
}

impl<'a> IntoIterator for &'a CanonicalDataset {
    type Item = &'a CanonicalRecord;
    type IntoIter = std::slice::Iter<'a, CanonicalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Concatenates normalized sources in the order given. Empty sources add no
/// rows; merging nothing yields an empty dataset.
pub fn merge(sources: Vec<NormalizedSource>) -> CanonicalDataset {
    let total: usize = sources.iter().map(|source| source.records.len()).sum();
    let mut records = Vec::with_capacity(total);
    let mut provenance = Vec::with_capacity(sources.len());

    for source in sources {
        provenance.push(SourceProvenance {
            source: source.source.to_string(),
            platform: source.platform,
            rows: source.records.len(),
            columns: source.columns,
        });
        records.extend(source.records);
    }

    CanonicalDataset {
        records,
        provenance,
    }
}
