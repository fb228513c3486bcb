use compscout_core::RequestError;
use thiserror::Error;

/// Errors that escape a collection run.
///
/// Provider and parse failures are absorbed by the component that hit them,
/// so only a request that fails validation is reported here.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("invalid collection request: {0}")]
    InvalidRequest(#[from] RequestError),
}

/// Why a reasoning-service response could not be turned into structured data.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("response contains no JSON object")]
    NoJson,

    #[error("JSON has none of the expected keys: {0}")]
    MissingKeys(&'static str),

    #[error("JSON does not match the expected shape: {0}")]
    Decode(#[from] serde_json::Error),
}
