#![cfg(feature = "python-bindings")]

use pyo3::exceptions;
use pyo3::prelude::*;
use pyo3::types::PyModuleMethods;
use pyo3::{Bound, PyResult, Python, pymodule, types::PyModule};

use crate::processor::PipelineError;

pub mod py_dashboard;

pub mod py_dataset;

/// Convert Rust errors to Python exceptions
impl From<PipelineError> for PyErr {
    fn from(err: PipelineError) -> PyErr {
        match err {
            PipelineError::EmptyInput(_)
            | PipelineError::UnknownField(_)
            | PipelineError::InvalidArgument(_) => {
                exceptions::PyValueError::new_err(err.to_string())
            }
            other => exceptions::PyRuntimeError::new_err(other.to_string()),
        }
    }
}

#[pymodule]
fn engagement_analytics(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<py_dataset::PyDataset>()?;
    m.add_class::<py_dashboard::PyDashboardCache>()?;
    Ok(())
}
