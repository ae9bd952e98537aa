use thiserror::Error;

pub type Result<T> = std::result::Result<T, FaultlineError>;

/// Errors raised while wiring or running the translator's collaborators.
///
/// These never reach a client: the translator logs them and moves on.
#[derive(Debug, Error)]
pub enum FaultlineError {
    #[error("Invalid configuration value for {key}: {value}")]
    InvalidConfig { key: String, value: String },

    #[error("Query cancellation failed for {query_id}: {message}")]
    CancelFailed { query_id: String, message: String },

    #[error("No async runtime available: {0}")]
    NoRuntime(String),
}

impl FaultlineError {
    pub fn cancel_failed(query_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CancelFailed {
            query_id: query_id.into(),
            message: message.into(),
        }
    }
}
