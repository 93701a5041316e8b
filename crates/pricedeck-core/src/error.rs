use thiserror::Error;

/// Shown to the user whenever a pipeline stage fails for a reason other
/// than an empty selection.
pub const GENERIC_MESSAGE: &str = "An error occurred.";

/// Failures talking to the upstream quote provider.
///
/// None of these are retried; they propagate to the caller of
/// [`aggregate()`](crate::aggregate::aggregate) and abort that group's render.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("[{symbol}] network error: {source}")]
    Network {
        symbol: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("[{0}] symbol not found")]
    SymbolNotFound(String),

    #[error("[{0}] rate limited by provider")]
    RateLimited(String),

    #[error("[{symbol}] provider returned HTTP {status}")]
    Status { symbol: String, status: u16 },

    #[error("[{symbol}] malformed payload: {message}")]
    Malformed { symbol: String, message: String },
}

/// Problems with the parameters a user picked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// No labels were chosen; carries the group's dedicated prompt.
    #[error("{prompt}")]
    Empty { prompt: &'static str },

    #[error("labels not found: {}", .0.join(", "))]
    UnknownLabels(Vec<String>),

    #[error("value range ({min}, {max}) must satisfy {lower} <= min <= max <= {upper}")]
    InvalidRange {
        min: i64,
        max: i64,
        lower: i64,
        upper: i64,
    },

    #[error("lookback of {0} days is outside 1..=50")]
    Lookback(u32),
}

/// Everything that can stop one group's render.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Reshape mismatches, chart serialization failures and the like.
    #[error("{0}")]
    Unhandled(String),
}

impl PipelineError {
    /// Message for the presentation layer.
    ///
    /// Only an empty selection is surfaced specifically; every other failure
    /// collapses to [`GENERIC_MESSAGE`] and the detail goes to the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            PipelineError::Selection(SelectionError::Empty { prompt }) => prompt,
            _ => GENERIC_MESSAGE,
        }
    }

    pub fn is_empty_selection(&self) -> bool {
        matches!(self, PipelineError::Selection(SelectionError::Empty { .. }))
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self {
        PipelineError::Unhandled(format!("chart serialization failed: {e}"))
    }
}
