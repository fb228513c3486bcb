use compscout_core::ProviderError;
use thiserror::Error;

/// Errors raised by the HTTP provider clients.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// HTTP 401 or 403.
    #[error("credentials rejected by {url}")]
    Unauthorized { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("reasoning service returned no completion choices")]
    EmptyCompletion,
}

impl From<ClientError> for ProviderError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) => ProviderError::Transport(e.to_string()),
            ClientError::Deserialize { context, source } => ProviderError::Deserialize {
                context,
                reason: source.to_string(),
            },
            ClientError::Unauthorized { url } => ProviderError::Unauthorized { url },
            ClientError::UnexpectedStatus { status, url } => {
                ProviderError::UnexpectedStatus { status, url }
            }
            other @ (ClientError::InvalidBaseUrl { .. } | ClientError::EmptyCompletion) => {
                ProviderError::Other(other.to_string())
            }
        }
    }
}
