use thiserror::Error;

/// Failure talking to the knowledge-base API. Every variant is terminal
/// for that one request.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{endpoint} returned {status}: {reason}")]
    Status {
        endpoint: &'static str,
        status: u16,
        reason: String,
    },

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn status(endpoint: &'static str, status: reqwest::StatusCode) -> Self {
        let reason = status
            .canonical_reason()
            .unwrap_or("Unknown Status")
            .to_string();
        ApiError::Status {
            endpoint,
            status: status.as_u16(),
            reason,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
