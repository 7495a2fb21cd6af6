//! # Engagement Analytics
//!
//! Filter-and-aggregate pipeline behind a social media engagement dashboard.
//! It supports:
//!
//! - Memory-mapped, parallel CSV loading with header-based column lookup
//! - Sidebar-style filtering by platform, content type and year
//! - KPI computation (total engagement, average engagement rate, ad spend,
//!   revenue, average ROI)
//! - Group-by summaries (sum, count, average, min, max) and "best of" lookups
//! - Cached dashboards keyed by filter selection
//!
//! Every record carries `revenue_generated = ad_spend * (1 + roi)`, derived
//! when it enters a [`Dataset`].
//!
//! # Example
//!
//! ```rust
//! use engagement_analytics::{Dataset, Dimension, Metric, RawRecord};
//! use engagement_analytics::processor::aggregate::{compute_kpis, group_mean};
//!
//! let row = |platform: &str, engagement: f64, rate: f64, spend: f64, roi: f64| RawRecord {
//!     platform: platform.into(),
//!     content_type: "video".into(),
//!     year: 2023,
//!     post_hour: 9,
//!     campaign_name: None,
//!     engagement,
//!     engagement_rate: rate,
//!     ad_spend: spend,
//!     roi,
//!     date: None,
//! };
//! let dataset = Dataset::from_records([row("A", 10.0, 5.0, 100.0, 0.5), row("B", 20.0, 15.0, 200.0, 1.0)]);
//! let view = dataset.full_view();
//!
//! let kpis = compute_kpis(&view);
//! assert_eq!(kpis.total_engagement, 30.0);
//! assert_eq!(kpis.total_revenue, 550.0);
//!
//! let best = group_mean(&view, Dimension::Platform, Metric::EngagementRate).argmax()?;
//! assert_eq!(best.key.as_str(), Some("B"));
//! # Ok::<(), engagement_analytics::PipelineError>(())
//! ```

pub mod config;
pub mod processor;
pub mod report;

#[cfg(feature = "python-bindings")]
pub mod python;

pub use processor::{
    AggregateOp, ParseSummary, PipelineError, Value,
    aggregate::{GroupedAggregate, KpiSummary, TopGroup},
    column::{Dimension, Measure, Metric},
    dataset::{Dataset, FilteredView},
    query_builder::{Dashboard, DashboardCache, DashboardQuery},
    record::{EngagementRecord, RawRecord},
    selection::FilterSelection,
};
