use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An engagement row as handed over by ingestion, before derived fields exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub platform: String,
    pub content_type: String,
    pub year: i32,
    pub post_hour: u8,
    #[serde(default)]
    pub campaign_name: Option<String>,
    pub engagement: f64,
    pub engagement_rate: f64,
    pub ad_spend: f64,
    pub roi: f64,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// One engagement event inside a [`Dataset`](super::dataset::Dataset).
///
/// Only built from a [`RawRecord`], so `revenue_generated` is always
/// `ad_spend * (1 + roi)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementRecord {
    pub platform: String,
    pub content_type: String,
    pub year: i32,
    pub post_hour: u8,
    pub campaign_name: Option<String>,
    pub engagement: f64,
    pub engagement_rate: f64,
    pub ad_spend: f64,
    pub roi: f64,
    pub date: Option<NaiveDate>,
    revenue_generated: f64,
}

impl EngagementRecord {
    pub fn revenue_generated(&self) -> f64 {
        self.revenue_generated
    }
}

impl From<RawRecord> for EngagementRecord {
    fn from(raw: RawRecord) -> Self {
        let revenue_generated = raw.ad_spend * (1.0 + raw.roi);
        EngagementRecord {
            platform: raw.platform,
            content_type: raw.content_type,
            year: raw.year,
            post_hour: raw.post_hour,
            campaign_name: raw.campaign_name,
            engagement: raw.engagement,
            engagement_rate: raw.engagement_rate,
            ad_spend: raw.ad_spend,
            roi: raw.roi,
            date: raw.date,
            revenue_generated,
        }
    }
}
