use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read request file {path}: {source}")]
    RequestFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse request file: {0}")]
    RequestFileParse(#[from] serde_yaml::Error),

    #[error("invalid collection request: {0}")]
    InvalidRequest(#[from] RequestError),
}

/// Validation failures for a [`crate::CollectionRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("search keyword must be non-empty")]
    EmptySearchKeyword,

    #[error("selected title must be non-empty")]
    EmptyTitle,

    #[error("content type must be non-empty")]
    EmptyContentType,

    #[error("sub keyword at position {0} is blank")]
    BlankSubKeyword(usize),
}

/// Failures reported by an external search, crawl, subtitle or reasoning
/// provider.
///
/// None of these end a collection run: the component that made the call
/// logs the error and degrades to an empty or default result.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("could not decode {context}: {reason}")]
    Deserialize { context: String, reason: String },

    #[error("provider rejected credentials for {url}")]
    Unauthorized { url: String },

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_messages_carry_context() {
        let unauthorized = ProviderError::Unauthorized {
            url: "http://gateway/blogs".to_string(),
        };
        assert_eq!(
            unauthorized.to_string(),
            "provider rejected credentials for http://gateway/blogs"
        );
        let status = ProviderError::UnexpectedStatus {
            status: 502,
            url: "http://gateway".to_string(),
        };
        assert_eq!(status.to_string(), "unexpected HTTP status 502 from http://gateway");
    }

    #[test]
    fn request_error_messages_name_the_field() {
        assert_eq!(
            RequestError::BlankSubKeyword(2).to_string(),
            "sub keyword at position 2 is blank"
        );
    }
}
