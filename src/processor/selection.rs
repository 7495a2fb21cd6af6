use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::processor::{dataset::Dataset, record::EngagementRecord};

/// Sidebar filter state: the platforms, content types and years a record
/// must belong to.
///
/// An empty set matches nothing; it is not a wildcard. Start from
/// [`FilterSelection::all`] for the "everything selected" state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSelection {
    pub platforms: BTreeSet<String>,
    pub content_types: BTreeSet<String>,
    pub years: BTreeSet<i32>,
}

impl FilterSelection {
    /// Selection that matches no record.
    pub fn none() -> Self {
        FilterSelection {
            platforms: BTreeSet::new(),
            content_types: BTreeSet::new(),
            years: BTreeSet::new(),
        }
    }

    /// Selection holding every distinct value present in `dataset`.
    pub fn all(dataset: &Dataset) -> Self {
        let mut selection = FilterSelection::none();
        for record in dataset.records() {
            selection.platforms.insert(record.platform.clone());
            selection.content_types.insert(record.content_type.clone());
            selection.years.insert(record.year);
        }
        selection
    }

    pub fn with_platforms<I, S>(mut self, platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.platforms = platforms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_content_types<I, S>(mut self, content_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content_types = content_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_years<I>(mut self, years: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        self.years = years.into_iter().collect();
        self
    }

    pub fn matches(&self, record: &EngagementRecord) -> bool {
        self.platforms.contains(&record.platform)
            && self.content_types.contains(&record.content_type)
            && self.years.contains(&record.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::record::RawRecord;

    fn dataset() -> Dataset {
        let row = |platform: &str, year: i32| RawRecord {
            platform: platform.into(),
            content_type: "video".into(),
            year,
            post_hour: 9,
            campaign_name: None,
            engagement: 1.0,
            engagement_rate: 1.0,
            ad_spend: 0.0,
            roi: 0.0,
            date: None,
        };
        Dataset::from_records([row("Instagram", 2023), row("TikTok", 2024)])
    }

    #[test]
    fn test_none_matches_nothing() {
        let data = dataset();
        let selection = FilterSelection::none();
        assert!(data.records().iter().all(|r| !selection.matches(r)));
    }

    #[test]
    fn test_all_matches_everything() {
        let data = dataset();
        let selection = FilterSelection::all(&data);
        assert_eq!(selection.years, BTreeSet::from([2023, 2024]));
        assert!(data.records().iter().all(|r| selection.matches(r)));
    }
}
