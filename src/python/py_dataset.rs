use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::path::Path;
use std::rc::Rc;

use crate::processor::{
    Value,
    aggregate::group_mean,
    column::{Dimension, Metric},
    dataset::Dataset,
    query_builder::DashboardQuery,
    selection::FilterSelection,
};
use crate::python::py_dashboard::{PyDashboardCache, dashboard_to_dict, grouped_to_dict};

#[pyclass(unsendable, name = "Dataset")]
pub struct PyDataset {
    inner: Rc<Dataset>,
}

impl PyDataset {
    fn selection(
        &self,
        platforms: Option<Vec<String>>,
        content_types: Option<Vec<String>>,
        years: Option<Vec<i32>>,
    ) -> FilterSelection {
        // the dataset scan only fills dimensions the caller left open
        let mut selection = if platforms.is_some() && content_types.is_some() && years.is_some() {
            FilterSelection::none()
        } else {
            FilterSelection::all(&self.inner)
        };
        if let Some(p) = platforms {
            selection = selection.with_platforms(p);
        }
        if let Some(c) = content_types {
            selection = selection.with_content_types(c);
        }
        if let Some(y) = years {
            selection = selection.with_years(y);
        }
        selection
    }

    fn distinct_strings(&self, dimension: Dimension) -> Vec<String> {
        self.inner
            .distinct(dimension)
            .into_iter()
            .map(|v| v.to_string())
            .collect()
    }
}

#[pymethods]
impl PyDataset {
    #[new]
    pub fn new(path: String) -> PyResult<Self> {
        let (dataset, summary) = Dataset::load_csv(Path::new(&path))?;
        if !summary.errors.is_empty() {
            tracing::warn!(rejected = summary.errors.len(), "skipped unparsable rows");
        }
        Ok(PyDataset {
            inner: Rc::new(dataset),
        })
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    pub fn platforms(&self) -> Vec<String> {
        self.distinct_strings(Dimension::Platform)
    }

    pub fn content_types(&self) -> Vec<String> {
        self.distinct_strings(Dimension::ContentType)
    }

    pub fn years(&self) -> Vec<i64> {
        self.inner
            .distinct(Dimension::Year)
            .iter()
            .filter_map(Value::as_int)
            .collect()
    }

    #[pyo3(signature = (platforms=None, content_types=None, years=None, cache=None))]
    pub fn dashboard<'py>(
        &self,
        py: Python<'py>,
        platforms: Option<Vec<String>>,
        content_types: Option<Vec<String>>,
        years: Option<Vec<i32>>,
        cache: Option<PyRef<'_, PyDashboardCache>>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let selection = self.selection(platforms, content_types, years);
        let cache = cache.map(|c| c.inner.clone());
        let dashboard =
            DashboardQuery::with_selection(self.inner.clone(), cache, selection).execute();
        dashboard_to_dict(py, &dashboard)
    }

    #[pyo3(signature = (dimension, metric, platforms=None, content_types=None, years=None))]
    pub fn group_mean<'py>(
        &self,
        py: Python<'py>,
        dimension: &str,
        metric: &str,
        platforms: Option<Vec<String>>,
        content_types: Option<Vec<String>>,
        years: Option<Vec<i32>>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let dimension: Dimension = dimension.parse()?;
        let metric: Metric = metric.parse()?;
        let selection = self.selection(platforms, content_types, years);
        let view = self.inner.filter(&selection);
        grouped_to_dict(py, &group_mean(&view, dimension, metric))
    }
}
