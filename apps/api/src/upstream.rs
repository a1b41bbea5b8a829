//! Shared plumbing for every outbound call to a third-party service.
//!
//! All collaborators (Hugging Face inference, Gemini, IBM tone analysis, the
//! fitness bridge) send through [`send_with_retry`], so timeouts, retry policy
//! and error classification live in one place.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use thiserror::Error;
use tracing::warn;

/// Total attempts per request, including the first one.
pub const MAX_ATTEMPTS: u32 = 3;
const BASE_BACKOFF_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{service} request failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} timed out")]
    Timeout { service: &'static str },

    #[error("{service} returned status {status}: {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("{service} returned an unexpected payload: {message}")]
    Parse {
        service: &'static str,
        message: String,
    },

    #[error("{service} returned empty content")]
    EmptyContent { service: &'static str },

    #[error("could not read audio for {service}: {source}")]
    Audio {
        service: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{service} is not configured")]
    NotConfigured { service: &'static str },
}

impl UpstreamError {
    pub fn parse(service: &'static str, message: impl Into<String>) -> Self {
        UpstreamError::Parse {
            service,
            message: message.into(),
        }
    }

    /// Whether the same request could succeed if sent again later.
    pub fn is_retryable(&self) -> bool {
        match self {
            UpstreamError::Timeout { .. } | UpstreamError::Http { .. } => true,
            UpstreamError::Api { status, .. } => *status == 429 || *status >= 500,
            UpstreamError::Parse { .. }
            | UpstreamError::EmptyContent { .. }
            | UpstreamError::Audio { .. }
            | UpstreamError::NotConfigured { .. } => false,
        }
    }

    pub fn service(&self) -> &'static str {
        match self {
            UpstreamError::Http { service, .. }
            | UpstreamError::Timeout { service }
            | UpstreamError::Api { service, .. }
            | UpstreamError::Parse { service, .. }
            | UpstreamError::EmptyContent { service }
            | UpstreamError::Audio { service, .. }
            | UpstreamError::NotConfigured { service } => service,
        }
    }
}

/// Builds the shared HTTP client. The timeout bounds every single attempt.
pub fn http_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Sends a request built by `build`, retrying on transport errors, timeouts,
/// 429 and 5xx with exponential backoff (500ms, 1s).
///
/// `build` is called once per attempt because a `RequestBuilder` is consumed
/// by `send`. Non-retryable statuses are returned immediately as `Api` errors.
pub async fn send_with_retry<F>(service: &'static str, build: F) -> Result<Response, UpstreamError>
where
    F: Fn() -> RequestBuilder,
{
    let mut last_error: Option<UpstreamError> = None;

    for attempt in 0..MAX_ATTEMPTS {
        if attempt > 0 {
            let delay = Duration::from_millis(BASE_BACKOFF_MS * (1 << (attempt - 1)));
            warn!(
                "{service} attempt {} failed, retrying after {}ms...",
                attempt,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }

        let response = match build().send().await {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                last_error = Some(UpstreamError::Timeout { service });
                continue;
            }
            Err(e) => {
                last_error = Some(UpstreamError::Http { service, source: e });
                continue;
            }
        };

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!("{service} returned {status}: {body}");
            last_error = Some(UpstreamError::Api {
                service,
                status: status.as_u16(),
                message: body,
            });
            continue;
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Api {
                service,
                status: status.as_u16(),
                message,
            });
        }

        return Ok(response);
    }

    Err(last_error.unwrap_or(UpstreamError::Timeout { service }))
}

/// Reads the whole body and decodes it as JSON, keeping the raw text in the
/// error so malformed provider payloads are diagnosable.
pub async fn read_json<T: serde::de::DeserializeOwned>(
    service: &'static str,
    response: Response,
) -> Result<T, UpstreamError> {
    let body = response
        .text()
        .await
        .map_err(|source| UpstreamError::Http { service, source })?;
    serde_json::from_str(&body).map_err(|e| UpstreamError::parse(service, format!("{e}: {body}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_retryable() {
        assert!(UpstreamError::Timeout { service: "gemini" }.is_retryable());
    }

    #[test]
    fn test_rate_limit_and_server_errors_are_retryable() {
        for status in [429, 500, 503] {
            let err = UpstreamError::Api {
                service: "huggingface",
                status,
                message: String::new(),
            };
            assert!(err.is_retryable(), "status {status} should be retryable");
        }
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        let err = UpstreamError::Api {
            service: "huggingface",
            status: 401,
            message: "bad token".to_string(),
        };
        assert!(!err.is_retryable());
        assert!(!UpstreamError::parse("gemini", "not json").is_retryable());
        assert!(!UpstreamError::NotConfigured { service: "garmin" }.is_retryable());
    }

    #[test]
    fn test_error_message_names_service() {
        let err = UpstreamError::Api {
            service: "ibm-tone-analyzer",
            status: 404,
            message: "unknown version".to_string(),
        };
        assert_eq!(err.service(), "ibm-tone-analyzer");
        assert!(err.to_string().contains("ibm-tone-analyzer"));
        assert!(err.to_string().contains("404"));
    }
}
