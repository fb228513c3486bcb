//! Request plumbing shared by the gateway and chat clients.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// Builds a `reqwest::Client` with the configured timeout and `User-Agent`.
pub(crate) fn build_client(timeout_secs: u64, user_agent: &str) -> Result<Client, ClientError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()
        .map_err(ClientError::Http)
}

/// Validates `base_url` and returns it without a trailing slash, so paths can
/// be appended with `format!("{base}/path")`.
pub(crate) fn normalise_base_url(base_url: &str) -> Result<String, ClientError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|e| ClientError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: format!("unsupported scheme {}", parsed.scheme()),
        });
    }
    Ok(trimmed.to_owned())
}

/// Maps non-2xx responses to typed errors. 401 and 403 both mean the
/// credentials were refused.
pub(crate) fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ClientError::Unauthorized {
            url: response.url().to_string(),
        });
    }
    if !status.is_success() {
        return Err(ClientError::UnexpectedStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    Ok(response)
}

/// Reads the body as text and decodes it, naming `context` on failure.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    context: impl FnOnce() -> String,
) -> Result<T, ClientError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
        context: context(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_trailing_slashes() {
        assert_eq!(
            normalise_base_url("http://localhost:8080//").unwrap(),
            "http://localhost:8080"
        );
        assert_eq!(
            normalise_base_url("https://api.openai.com/v1/").unwrap(),
            "https://api.openai.com/v1"
        );
    }

    #[test]
    fn base_url_must_be_http() {
        assert!(matches!(
            normalise_base_url("not a url"),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            normalise_base_url("ftp://files.example"),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
    }
}
