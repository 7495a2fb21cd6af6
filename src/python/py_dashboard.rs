use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::rc::Rc;

use crate::processor::{
    Value,
    aggregate::{GroupedAggregate, KpiSummary, TopGroup},
    query_builder::{DEFAULT_CACHE_CAPACITY, Dashboard, DashboardCache},
};

/// Python bindings for DashboardCache
#[pyclass(unsendable, name = "DashboardCache")]
pub struct PyDashboardCache {
    pub inner: Rc<DashboardCache>,
}

#[pymethods]
impl PyDashboardCache {
    #[new]
    #[pyo3(signature = (capacity = DEFAULT_CACHE_CAPACITY.get()))]
    fn new(capacity: usize) -> PyResult<Self> {
        Ok(Self {
            inner: Rc::new(DashboardCache::try_with_capacity(capacity)?),
        })
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

pub(crate) fn set_key<'py>(
    dict: &Bound<'py, PyDict>,
    key: &Value,
    value: impl IntoPyObject<'py>,
) -> PyResult<()> {
    match key {
        Value::Int(v) => dict.set_item(*v, value),
        Value::Str(s) => dict.set_item(s.as_str(), value),
    }
}

/// `{key: value}` for single-measure tables, `{key: {measure: value}}` otherwise.
pub(crate) fn grouped_to_dict<'py>(
    py: Python<'py>,
    table: &GroupedAggregate,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    let measures = table.measures();

    for (key, values) in table.iter() {
        if let [single] = values {
            set_key(&dict, key, *single)?;
        } else {
            let row = PyDict::new(py);
            for (measure, v) in measures.iter().zip(values) {
                row.set_item(measure.metric.name(), *v)?;
            }
            set_key(&dict, key, row)?;
        }
    }
    Ok(dict)
}

fn kpis_to_dict<'py>(py: Python<'py>, kpis: &KpiSummary) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("record_count", kpis.record_count)?;
    dict.set_item("total_engagement", kpis.total_engagement)?;
    dict.set_item("avg_engagement_rate", kpis.avg_engagement_rate)?;
    dict.set_item("total_ad_spend", kpis.total_ad_spend)?;
    dict.set_item("total_revenue", kpis.total_revenue)?;
    dict.set_item("avg_roi", kpis.avg_roi)?;
    Ok(dict)
}

fn top_to_py(py: Python<'_>, top: Option<&TopGroup>) -> PyResult<Py<PyAny>> {
    let Some(top) = top else {
        return Ok(py.None());
    };
    let key = match &top.key {
        Value::Int(v) => v.into_pyobject(py)?.into_any(),
        Value::Str(s) => s.as_str().into_pyobject(py)?.into_any(),
    };
    let value = top.value.into_pyobject(py)?.into_any();
    Ok((key, value).into_pyobject(py)?.into_any().unbind())
}

pub(crate) fn dashboard_to_dict<'py>(
    py: Python<'py>,
    dashboard: &Dashboard,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("kpis", kpis_to_dict(py, &dashboard.kpis)?)?;
    dict.set_item(
        "platform_engagement",
        grouped_to_dict(py, &dashboard.platform_engagement)?,
    )?;
    dict.set_item(
        "content_engagement",
        grouped_to_dict(py, &dashboard.content_engagement)?,
    )?;
    dict.set_item(
        "campaign_performance",
        grouped_to_dict(py, &dashboard.campaign_performance)?,
    )?;
    dict.set_item(
        "hourly_engagement",
        grouped_to_dict(py, &dashboard.hourly_engagement)?,
    )?;
    dict.set_item(
        "best_platform",
        top_to_py(py, dashboard.best_platform.as_ref())?,
    )?;
    dict.set_item("best_hour", top_to_py(py, dashboard.best_hour.as_ref())?)?;
    Ok(dict)
}
