use thiserror::Error;

/// The four error kinds the engine can raise, matching their fatal/non-fatal
/// treatment: only `TransientNetworkError` is ever recovered locally, the
/// rest propagate to `main` and terminate the run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("config error: {0}")]
    Config(String),

    #[error("data quality error: {0}")]
    DataQuality(String),

    #[error("transient network error: {0}")]
    TransientNetwork(String),

    #[error("malformed input: {0}")]
    MalformedInput(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
