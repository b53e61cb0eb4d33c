pub mod export;
pub mod sources;
pub mod summary;

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use clap::Args;
use socialdash_core::filters::{parse_day, DateRange, FilterSelection};
use socialdash_core::merge::CanonicalDataset;
use socialdash_core::Platform;

/// Filter flags shared by `summary` and `export`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Keep only this platform (repeatable); defaults to every loaded platform
    #[arg(long = "platform")]
    pub platforms: Vec<String>,

    /// Keep only this post type (repeatable); defaults to every loaded type
    #[arg(long = "subtype")]
    pub subtypes: Vec<String>,

    /// First day to include (YYYY-MM-DD)
    #[arg(long, conflicts_with = "all_dates")]
    pub from: Option<String>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long, conflicts_with = "all_dates")]
    pub to: Option<String>,

    /// Ignore dates entirely, keeping undated records
    #[arg(long)]
    pub all_dates: bool,
}

impl FilterArgs {
    /// Flags left out fall back to the dataset's own platforms, post types and
    /// default date range.
    pub fn selection(&self, dataset: &CanonicalDataset, today: NaiveDate) -> Result<FilterSelection> {
        let mut selection = FilterSelection::everything(dataset, today);

        if !self.platforms.is_empty() {
            let platforms = self
                .platforms
                .iter()
                .map(|name| Platform::try_from(name.as_str()).map_err(|err| anyhow!(err)))
                .collect::<Result<Vec<_>>>()?;
            selection = selection.with_platforms(platforms);
        }

        if !self.subtypes.is_empty() {
            selection = selection.with_subtypes(self.subtypes.iter().cloned());
        }

        let date_range = if self.all_dates {
            None
        } else {
            let default = DateRange::default_for(dataset, today);
            let start = match &self.from {
                Some(value) => parse_day(value)?,
                None => default.start,
            };
            let end = match &self.to {
                Some(value) => parse_day(value)?,
                None => default.end,
            };
            Some(DateRange::new(start, end))
        };

        Ok(selection.with_date_range(date_range))
    }
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use socialdash_core::merge::{merge, NormalizedSource};
    use socialdash_core::types::CanonicalRecord;
    use socialdash_core::SourceId;

    fn record(platform: Platform, day: u32, subtype: &str) -> CanonicalRecord {
        CanonicalRecord {
            post_id: Some(format!("{platform}-{day}")),
            comment_id: None,
            platform,
            subtype: subtype.to_string(),
            date_created: Some(Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()),
            num_likes: 1,
            num_replies: 0,
            video_length: 0.0,
            comment_text: String::new(),
            user_url: String::new(),
            post_url: String::new(),
        }
    }

    fn dataset() -> CanonicalDataset {
        let mut source = NormalizedSource::empty(SourceId::parse("memory.csv"));
        source.records = vec![
            record(Platform::Facebook, 1, "photo"),
            record(Platform::TikTok, 5, "video"),
        ];
        merge(vec![source])
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn omitted_flags_select_everything_in_the_dataset() {
        let dataset = dataset();
        let selection = FilterArgs::default().selection(&dataset, day(20)).unwrap();

        assert_eq!(selection, FilterSelection::everything(&dataset, day(20)));
        assert_eq!(selection.date_range, Some(DateRange::new(day(1), day(5))));
    }

    #[test]
    fn partial_date_flags_keep_the_other_default_bound() {
        let args = FilterArgs {
            from: Some("2024-03-03".to_string()),
            ..FilterArgs::default()
        };
        let selection = args.selection(&dataset(), day(20)).unwrap();

        assert_eq!(selection.date_range, Some(DateRange::new(day(3), day(5))));
    }

    #[test]
    fn platform_aliases_and_all_dates_are_honored() {
        let args = FilterArgs {
            platforms: vec!["fb".to_string()],
            subtypes: vec!["photo".to_string()],
            all_dates: true,
            ..FilterArgs::default()
        };
        let selection = args.selection(&dataset(), day(20)).unwrap();

        assert_eq!(selection.platforms.into_iter().collect::<Vec<_>>(), vec![Platform::Facebook]);
        assert_eq!(selection.subtypes.into_iter().collect::<Vec<_>>(), vec!["photo".to_string()]);
        assert_eq!(selection.date_range, None);
    }

    #[test]
    fn bad_platform_or_date_is_an_error() {
        let bad_platform = FilterArgs {
            platforms: vec!["myspace".to_string()],
            ..FilterArgs::default()
        };
        assert!(bad_platform.selection(&dataset(), day(20)).is_err());

        let bad_date = FilterArgs {
            to: Some("03/05/2024".to_string()),
            ..FilterArgs::default()
        };
        assert!(bad_date.selection(&dataset(), day(20)).is_err());
    }
}
