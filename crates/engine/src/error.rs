use std::fmt;

/// Per-worksheet engine failure. Every variant names the worksheet it
/// belongs to; one worksheet failing never aborts the run by itself —
/// the orchestrator decides continuation.
#[derive(Debug)]
pub enum EngineError {
    /// Missing required configuration field (e.g. `table_name`).
    Configuration { worksheet: String, message: String },
    /// Malformed query/filter combination.
    QueryResolution { worksheet: String, message: String },
    /// Result set shape does not match what a summary requires.
    DataShape { worksheet: String, column: String },
    /// Connection or query failure from the executor. Carries a bounded
    /// preview of the offending query for diagnostics.
    Execution {
        worksheet: String,
        message: String,
        query_preview: String,
    },
}

impl EngineError {
    /// The worksheet this error is attributed to.
    pub fn worksheet(&self) -> &str {
        match self {
            Self::Configuration { worksheet, .. }
            | Self::QueryResolution { worksheet, .. }
            | Self::DataShape { worksheet, .. }
            | Self::Execution { worksheet, .. } => worksheet,
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { worksheet, message } => {
                write!(f, "worksheet '{worksheet}': configuration error: {message}")
            }
            Self::QueryResolution { worksheet, message } => {
                write!(f, "worksheet '{worksheet}': query resolution error: {message}")
            }
            Self::DataShape { worksheet, column } => {
                write!(f, "worksheet '{worksheet}': result set is missing column '{column}'")
            }
            Self::Execution {
                worksheet,
                message,
                query_preview,
            } => {
                write!(f, "worksheet '{worksheet}': execution error: {message} (query: {query_preview})")
            }
        }
    }
}

impl std::error::Error for EngineError {}
