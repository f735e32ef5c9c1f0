use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("{provider} does not support {operation} yet")]
    Unsupported {
        provider: String,
        operation: &'static str,
    },

    #[error("{provider} did not answer within {millis}ms")]
    Timeout { provider: String, millis: u64 },

    #[error("{provider} request failed: {message}")]
    Upstream { provider: String, message: String },

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}
