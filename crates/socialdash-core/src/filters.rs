use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use socialdash_parser::Platform;

use crate::error::{PipelineError, Result};
use crate::merge::CanonicalDataset;
use crate::types::CanonicalRecord;

/// Inclusive range of UTC calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    /// A reversed range contains nothing.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// The dataset's own date span, or `today` for both bounds when nothing
    /// in it is dated.
    pub fn default_for(dataset: &CanonicalDataset, today: NaiveDate) -> Self {
        match dataset.date_bounds() {
            Some((start, end)) => Self::new(start, end),
            None => Self::single_day(today),
        }
    }

    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self::new(parse_day(start)?, parse_day(end)?))
    }
}

pub fn parse_day(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|err| PipelineError::Filter(format!("invalid date '{value}': {err}")))
}

/// The active platform, post-type and date selection. Empty sets select
/// nothing; `date_range: None` leaves dates unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub platforms: BTreeSet<Platform>,
    pub subtypes: BTreeSet<String>,
    pub date_range: Option<DateRange>,
}

impl FilterSelection {
    /// Every platform and subtype present, over the default date range.
    pub fn everything(dataset: &CanonicalDataset, today: NaiveDate) -> Self {
        Self {
            platforms: dataset.platforms().into_iter().collect(),
            subtypes: dataset.subtypes().into_iter().collect(),
            date_range: Some(DateRange::default_for(dataset, today)),
        }
    }

    pub fn with_platforms<I: IntoIterator<Item = Platform>>(mut self, platforms: I) -> Self {
        self.platforms = platforms.into_iter().collect();
        self
    }

    pub fn with_subtypes<I, S>(mut self, subtypes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subtypes = subtypes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_date_range(mut self, date_range: Option<DateRange>) -> Self {
        self.date_range = date_range;
        self
    }

    fn exclusion(&self, record: &CanonicalRecord) -> Option<Exclusion> {
        if !self.platforms.contains(&record.platform) {
            return Some(Exclusion::Platform);
        }
        if !self.subtypes.contains(&record.subtype) {
            return Some(Exclusion::Subtype);
        }
        if let Some(range) = &self.date_range {
            // Undated records can never satisfy a range test.
            match record.created_day() {
                None => return Some(Exclusion::Undated),
                Some(day) if !range.contains(day) => return Some(Exclusion::OutOfRange),
                Some(_) => {}
            }
        }
        None
    }

    pub fn matches(&self, record: &CanonicalRecord) -> bool {
        self.exclusion(record).is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exclusion {
    Platform,
    Subtype,
    Undated,
    OutOfRange,
}

/// Why rows were left out, by the first predicate each one failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExclusionCounts {
    pub platform: usize,
    pub subtype: usize,
    pub undated: usize,
    pub out_of_range: usize,
}

impl ExclusionCounts {
    fn record(&mut self, exclusion: Exclusion) {
        match exclusion {
            Exclusion::Platform => self.platform += 1,
            Exclusion::Subtype => self.subtype += 1,
            Exclusion::Undated => self.undated += 1,
            Exclusion::OutOfRange => self.out_of_range += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.platform + self.subtype + self.undated + self.out_of_range
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    /// Nothing was loaded at all.
    NoData,
    /// Data exists but the selection excludes all of it.
    FilteredOut,
    Populated,
}

/// Records of one dataset that satisfy one selection. Borrowed, never copied.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    records: Vec<&'a CanonicalRecord>,
    dataset_len: usize,
    excluded: ExclusionCounts,
}

impl<'a> FilteredView<'a> {
    pub fn from_records(records: Vec<&'a CanonicalRecord>, dataset_len: usize) -> Self {
        Self {
            records,
            dataset_len,
            excluded: ExclusionCounts::default(),
        }
    }

    pub fn records(&self) -> &[&'a CanonicalRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a CanonicalRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dataset_len(&self) -> usize {
        self.dataset_len
    }

    pub fn excluded(&self) -> ExclusionCounts {
        self.excluded
    }

    pub fn status(&self) -> ViewStatus {
        if self.dataset_len == 0 {
            ViewStatus::NoData
        } else if self.records.is_empty() {
            ViewStatus::FilteredOut
        } else {
            ViewStatus::Populated
        }
    }
}

/// Applies `selection` to `dataset` without touching it.
pub fn filter<'a>(dataset: &'a CanonicalDataset, selection: &FilterSelection) -> FilteredView<'a> {
    let mut excluded = ExclusionCounts::default();
    let mut records = Vec::new();

    for record in dataset {
        match selection.exclusion(record) {
            None => records.push(record),
            Some(reason) => excluded.record(reason),
        }
    }

    FilteredView {
        records,
        dataset_len: dataset.len(),
        excluded,
    }
}
