/// Domain-specific error types for the analytics engine.
/// Invalid numeric input must fail fast with a descriptive error instead of
/// letting NaN propagate into display code. Degenerate aggregates (empty
/// portfolios, zero denominators) are not errors and resolve to defined
/// zero values at the call site.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("invalid pricing input: {0}")]
    InvalidInput(String),

    #[error("implied volatility did not converge after {iterations} iterations (last sigma {last_sigma:.6})")]
    IvNoConvergence { iterations: u32, last_sigma: f64 },

    #[error("sentiment source error: {0}")]
    SentimentSource(String),

    #[error("timestamp parse error: {0}")]
    TimestampParse(String),

    #[error("config error: {0}")]
    Config(String),
}

impl From<chrono::ParseError> for AnalyticsError {
    fn from(e: chrono::ParseError) -> Self {
        AnalyticsError::TimestampParse(e.to_string())
    }
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
