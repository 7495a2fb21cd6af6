use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::processor::{AggregateOp, PipelineError, Value, record::EngagementRecord};

/// Categorical columns a dataset can be grouped or filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Platform,
    ContentType,
    Year,
    PostHour,
    CampaignName,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Platform,
        Dimension::ContentType,
        Dimension::Year,
        Dimension::PostHour,
        Dimension::CampaignName,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Platform => "platform",
            Dimension::ContentType => "content_type",
            Dimension::Year => "year",
            Dimension::PostHour => "post_hour",
            Dimension::CampaignName => "campaign_name",
        }
    }

    /// Key of `record` in this dimension; `None` when the record has no value.
    pub fn of(self, record: &EngagementRecord) -> Option<Value> {
        match self {
            Dimension::Platform => Some(Value::Str(record.platform.clone())),
            Dimension::ContentType => Some(Value::Str(record.content_type.clone())),
            Dimension::Year => Some(Value::Int(record.year.into())),
            Dimension::PostHour => Some(Value::Int(record.post_hour.into())),
            Dimension::CampaignName => record.campaign_name.clone().map(Value::Str),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dimension {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| PipelineError::UnknownField(s.to_string()))
    }
}

/// Numeric columns that can be aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Engagement,
    EngagementRate,
    AdSpend,
    Roi,
    RevenueGenerated,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Engagement,
        Metric::EngagementRate,
        Metric::AdSpend,
        Metric::Roi,
        Metric::RevenueGenerated,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Engagement => "engagement",
            Metric::EngagementRate => "engagement_rate",
            Metric::AdSpend => "ad_spend",
            Metric::Roi => "roi",
            Metric::RevenueGenerated => "revenue_generated",
        }
    }

    pub fn of(self, record: &EngagementRecord) -> f64 {
        match self {
            Metric::Engagement => record.engagement,
            Metric::EngagementRate => record.engagement_rate,
            Metric::AdSpend => record.ad_spend,
            Metric::Roi => record.roi,
            Metric::RevenueGenerated => record.revenue_generated(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| PipelineError::UnknownField(s.to_string()))
    }
}

/// A metric paired with the operation that reduces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Measure {
    pub metric: Metric,
    pub op: AggregateOp,
}

impl Measure {
    pub fn new(metric: Metric, op: AggregateOp) -> Self {
        Measure { metric, op }
    }

    pub fn mean(metric: Metric) -> Self {
        Measure::new(metric, AggregateOp::Avg)
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.metric.name(), self.op.name())
    }
}
