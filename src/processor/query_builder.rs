use lru::LruCache;
use serde::Serialize;

use crate::processor::{
    PipelineError,
    aggregate::{
        GroupedAggregate, KpiSummary, TopGroup, apply_filters, compute_kpis, group_mean,
        group_mean_multi,
    },
    column::{Dimension, Metric},
    dataset::Dataset,
    selection::FilterSelection,
};
use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::rc::Rc;

pub const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(128) {
    Some(n) => n,
    None => unreachable!(),
};

/// Everything the dashboard shows for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub selection: FilterSelection,
    pub kpis: KpiSummary,
    /// Mean engagement rate per platform
    pub platform_engagement: GroupedAggregate,
    /// Mean engagement per content type
    pub content_engagement: GroupedAggregate,
    /// Mean revenue and ROI per named campaign
    pub campaign_performance: GroupedAggregate,
    /// Mean engagement per posting hour
    pub hourly_engagement: GroupedAggregate,
    pub best_platform: Option<TopGroup>,
    pub best_hour: Option<TopGroup>,
}

impl Dashboard {
    pub fn compute(dataset: &Dataset, selection: &FilterSelection) -> Self {
        let view = apply_filters(dataset, selection);

        let platform_engagement = group_mean(&view, Dimension::Platform, Metric::EngagementRate);
        let content_engagement = group_mean(&view, Dimension::ContentType, Metric::Engagement);
        let campaign_performance = group_mean_multi(
            &view,
            Dimension::CampaignName,
            &[Metric::RevenueGenerated, Metric::Roi],
        );
        let hourly_engagement = group_mean(&view, Dimension::PostHour, Metric::Engagement);

        tracing::debug!(
            rows = view.len(),
            platforms = platform_engagement.len(),
            campaigns = campaign_performance.len(),
            "computed dashboard"
        );

        Dashboard {
            selection: selection.clone(),
            kpis: compute_kpis(&view),
            best_platform: platform_engagement.argmax().ok(),
            best_hour: hourly_engagement.argmax().ok(),
            platform_engagement,
            content_engagement,
            campaign_performance,
            hourly_engagement,
        }
    }
}

/// LRU of computed dashboards keyed by selection.
///
/// Single-threaded; share it through `Rc` alongside the dataset it was filled
/// from. Entries are never invalidated, so do not reuse a cache across
/// datasets.
#[derive(Debug)]
pub struct DashboardCache {
    cache: RefCell<LruCache<FilterSelection, Dashboard>>,
}

impl DashboardCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            cache: RefCell::new(LruCache::new(capacity)),
        }
    }

    /// Like [`DashboardCache::with_capacity`] for an unchecked size.
    ///
    /// Fails with [`PipelineError::InvalidArgument`] when `capacity` is zero.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, PipelineError> {
        NonZeroUsize::new(capacity)
            .map(Self::with_capacity)
            .ok_or_else(|| {
                PipelineError::InvalidArgument("cache capacity must be at least 1".into())
            })
    }

    pub fn get(&self, key: &FilterSelection) -> Option<Dashboard> {
        self.cache.borrow_mut().get(key).cloned()
    }

    pub fn put(&self, key: FilterSelection, value: Dashboard) {
        self.cache.borrow_mut().put(key, value);
    }

    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }
}

impl Default for DashboardCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Fluent builder for a [`Dashboard`].
///
/// Dimensions left untouched keep every value present in the dataset.
///
/// # Example
///
/// ```rust
/// # use std::rc::Rc;
/// # use engagement_analytics::Dataset;
/// let dataset = Rc::new(Dataset::new());
/// let dashboard = dataset.query().platforms(["Instagram"]).years([2024]).execute();
/// assert_eq!(dashboard.kpis.record_count, 0);
/// ```
#[derive(Debug, Clone)]
pub struct DashboardQuery {
    dataset: Rc<Dataset>,
    cache: Option<Rc<DashboardCache>>,
    selection: FilterSelection,
}

impl DashboardQuery {
    pub fn new(dataset: Rc<Dataset>, cache: Option<Rc<DashboardCache>>) -> Self {
        let selection = FilterSelection::all(&dataset);
        Self::with_selection(dataset, cache, selection)
    }

    /// Starts from `selection` instead of scanning the dataset for every value.
    pub fn with_selection(
        dataset: Rc<Dataset>,
        cache: Option<Rc<DashboardCache>>,
        selection: FilterSelection,
    ) -> Self {
        Self {
            dataset,
            cache,
            selection,
        }
    }

    pub fn platforms<I, S>(mut self, platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection = self.selection.with_platforms(platforms);
        self
    }

    pub fn content_types<I, S>(mut self, content_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection = self.selection.with_content_types(content_types);
        self
    }

    pub fn years<I>(mut self, years: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        self.selection = self.selection.with_years(years);
        self
    }

    /// Replace the whole selection
    pub fn selection(mut self, selection: FilterSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Disable caching
    pub fn no_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    pub fn current_selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn execute(self) -> Dashboard {
        match &self.cache {
            Some(lru) => {
                if let Some(hit) = lru.get(&self.selection) {
                    tracing::debug!("dashboard cache hit");
                    return hit;
                }
                let dashboard = Dashboard::compute(&self.dataset, &self.selection);
                lru.put(self.selection, dashboard.clone());
                dashboard
            }
            None => Dashboard::compute(&self.dataset, &self.selection),
        }
    }
}

impl Dataset {
    pub fn query(self: &Rc<Self>) -> DashboardQuery {
        DashboardQuery::new(self.clone(), None)
    }

    pub fn query_with_cache(self: &Rc<Self>, cache: &Rc<DashboardCache>) -> DashboardQuery {
        DashboardQuery::new(self.clone(), Some(cache.clone()))
    }
}
