//! Filter-and-aggregate pipeline: KPIs, grouped summaries and "best of"
//! lookups over a [`FilteredView`].

use serde::Serialize;
use std::collections::BTreeMap;

use crate::processor::{
    AggregateOp, PipelineError, Value,
    column::{Dimension, Measure, Metric},
    dataset::{Dataset, FilteredView},
    selection::FilterSelection,
};

/// Running sum/count/min/max for one metric.
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: usize,
    min: f64,
    max: f64,
}

impl Accumulator {
    fn new() -> Self {
        Accumulator {
            sum: 0.0,
            count: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn push(&mut self, v: f64) {
        self.sum += v;
        self.count += 1;
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }

    /// `None` for avg/min/max over nothing.
    fn finish(&self, op: AggregateOp) -> Option<f64> {
        match op {
            AggregateOp::Sum => Some(self.sum),
            AggregateOp::Count => Some(self.count as f64),
            _ if self.count == 0 => None,
            AggregateOp::Avg => Some(self.sum / self.count as f64),
            AggregateOp::Min => Some(self.min),
            AggregateOp::Max => Some(self.max),
        }
    }
}

/// Headline numbers for the filtered dataset.
///
/// Means over an empty view are `None`; sums are `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub record_count: usize,
    pub total_engagement: f64,
    pub avg_engagement_rate: Option<f64>,
    pub total_ad_spend: f64,
    pub total_revenue: f64,
    pub avg_roi: Option<f64>,
}

/// Group key with its winning value, as returned by argmax.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopGroup {
    pub key: Value,
    pub value: f64,
}

/// Per-group summaries for one dimension.
///
/// Groups iterate in ascending key order. Each group carries one value per
/// entry in [`GroupedAggregate::measures`], in the same order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedAggregate {
    dimension: Dimension,
    measures: Vec<Measure>,
    groups: BTreeMap<Value, Vec<f64>>,
}

impl GroupedAggregate {
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn measures(&self) -> &[Measure] {
        &self.measures
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.groups.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &[f64])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Values of every measure for `key`.
    pub fn get(&self, key: &Value) -> Option<&[f64]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Value of the first measure over `metric` for `key`.
    pub fn value(&self, key: &Value, metric: Metric) -> Option<f64> {
        let idx = self.measure_index(metric)?;
        self.groups.get(key).map(|values| values[idx])
    }

    /// `(key, value)` pairs for the first measure over `metric`, in key order.
    pub fn series(&self, metric: Metric) -> Vec<(Value, f64)> {
        match self.measure_index(metric) {
            Some(idx) => self
                .groups
                .iter()
                .map(|(k, values)| (k.clone(), values[idx]))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Group with the largest value of the first measure.
    ///
    /// Ties go to the smallest key. Fails with [`PipelineError::EmptyInput`]
    /// when there are no groups.
    pub fn argmax(&self) -> Result<TopGroup, PipelineError> {
        self.argmax_at(0)
    }

    /// Like [`GroupedAggregate::argmax`] but ranks by the measure over `metric`.
    pub fn argmax_by(&self, metric: Metric) -> Result<TopGroup, PipelineError> {
        let idx = self
            .measure_index(metric)
            .ok_or_else(|| PipelineError::UnknownField(metric.name().to_string()))?;
        self.argmax_at(idx)
    }

    fn argmax_at(&self, idx: usize) -> Result<TopGroup, PipelineError> {
        let mut best: Option<(&Value, f64)> = None;
        for (key, values) in &self.groups {
            let Some(&v) = values.get(idx) else { continue };
            let better = match best {
                None => true,
                Some((_, b)) => v > b || (b.is_nan() && !v.is_nan()),
            };
            if better {
                best = Some((key, v));
            }
        }

        best.map(|(key, value)| TopGroup {
            key: key.clone(),
            value,
        })
        .ok_or_else(|| {
            PipelineError::EmptyInput(format!("no {} groups to rank", self.dimension))
        })
    }

    fn measure_index(&self, metric: Metric) -> Option<usize> {
        self.measures.iter().position(|m| m.metric == metric)
    }
}

/// Records of `dataset` passing `selection`, in original order.
pub fn apply_filters<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    dataset.filter(selection)
}

pub fn compute_kpis(view: &FilteredView<'_>) -> KpiSummary {
    let mut engagement = Accumulator::new();
    let mut rate = Accumulator::new();
    let mut spend = Accumulator::new();
    let mut revenue = Accumulator::new();
    let mut roi = Accumulator::new();

    for record in view.iter() {
        engagement.push(record.engagement);
        rate.push(record.engagement_rate);
        spend.push(record.ad_spend);
        revenue.push(record.revenue_generated());
        roi.push(record.roi);
    }

    KpiSummary {
        record_count: view.len(),
        total_engagement: engagement.sum,
        avg_engagement_rate: rate.finish(AggregateOp::Avg),
        total_ad_spend: spend.sum,
        total_revenue: revenue.sum,
        avg_roi: roi.finish(AggregateOp::Avg),
    }
}

/// Partitions `view` by `dimension` and reduces every measure per partition.
///
/// Records with no value for `dimension` are left out.
pub fn group_by(
    view: &FilteredView<'_>,
    dimension: Dimension,
    measures: &[Measure],
) -> GroupedAggregate {
    let mut partitions: BTreeMap<Value, Vec<Accumulator>> = BTreeMap::new();

    for record in view.iter() {
        let Some(key) = dimension.of(record) else {
            continue;
        };
        let accs = partitions
            .entry(key)
            .or_insert_with(|| vec![Accumulator::new(); measures.len()]);
        for (acc, measure) in accs.iter_mut().zip(measures) {
            acc.push(measure.metric.of(record));
        }
    }

    let groups = partitions
        .into_iter()
        .map(|(key, accs)| {
            let values = accs
                .iter()
                .zip(measures)
                // partitions are never empty, so every op yields a value
                .map(|(acc, m)| acc.finish(m.op).unwrap_or(f64::NAN))
                .collect();
            (key, values)
        })
        .collect();

    GroupedAggregate {
        dimension,
        measures: measures.to_vec(),
        groups,
    }
}

/// Mean of `metric` per `dimension` value.
pub fn group_mean(
    view: &FilteredView<'_>,
    dimension: Dimension,
    metric: Metric,
) -> GroupedAggregate {
    group_by(view, dimension, &[Measure::mean(metric)])
}

/// Means of several metrics per `dimension` value.
pub fn group_mean_multi(
    view: &FilteredView<'_>,
    dimension: Dimension,
    metrics: &[Metric],
) -> GroupedAggregate {
    let measures: Vec<Measure> = metrics.iter().copied().map(Measure::mean).collect();
    group_by(view, dimension, &measures)
}

/// Group with the highest first-measure value. See [`GroupedAggregate::argmax`].
pub fn argmax(aggregate: &GroupedAggregate) -> Result<TopGroup, PipelineError> {
    aggregate.argmax()
}
