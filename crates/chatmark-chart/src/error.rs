//! Chart error types.

/// Error building or updating a chart.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// A required top-level parameter is missing or empty.
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// The `data` object is incomplete.
    #[error("invalid chart data: {0}")]
    InvalidData(&'static str),

    /// No chart is registered under the identifier.
    #[error("chart {0:?} does not exist")]
    UnknownChart(String),

    /// The configuration is not valid JSON of the expected shape.
    #[error("invalid chart JSON: {0}")]
    Json(#[from] serde_json::Error),
}
