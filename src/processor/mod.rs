use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod aggregate;
pub mod column;
pub mod dataset;
pub mod query_builder;
pub mod record;
pub mod selection;

/// Error type used across the crate
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UTF8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Schema/parse error: {0}")]
    Parse(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Outcome of a CSV load: how many rows made it in and which ones did not.
#[derive(Debug, Default, Serialize)]
pub struct ParseSummary {
    pub rows_processed: usize,
    pub errors: Vec<ParseError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseError {
    /// 1-based line in the source file (the header is line 1)
    pub line: usize,
    pub column: String,
    pub value: String,
    pub error: Option<String>,
}

/// A group key. Categorical dimensions produce `Str`, integer ones `Int`.
///
/// Ordering is numeric for `Int` and lexicographic for `Str`; grouped results
/// iterate in this order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Str(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Str(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

/// Aggregate operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateOp {
    /// Sum of all numeric values
    Sum,
    /// Count of all rows
    Count,
    /// Average of numeric values
    Avg,
    /// Minimum value
    Min,
    /// Maximum value
    Max,
}

impl AggregateOp {
    pub fn name(self) -> &'static str {
        match self {
            AggregateOp::Sum => "sum",
            AggregateOp::Count => "count",
            AggregateOp::Avg => "avg",
            AggregateOp::Min => "min",
            AggregateOp::Max => "max",
        }
    }
}

impl std::str::FromStr for AggregateOp {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sum" => Ok(AggregateOp::Sum),
            "count" => Ok(AggregateOp::Count),
            "avg" | "mean" => Ok(AggregateOp::Avg),
            "min" => Ok(AggregateOp::Min),
            "max" => Ok(AggregateOp::Max),
            other => Err(PipelineError::UnknownField(other.to_string())),
        }
    }
}
