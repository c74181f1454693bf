use std::fmt;

use tracing::error;

use super::error::ApiResult;

/// A transient, user-visible notification (the dashboard's toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn error(msg: impl Into<String>) -> Self {
        Notice::Error(msg.into())
    }

    pub fn success(msg: impl Into<String>) -> Self {
        Notice::Success(msg.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Success(msg) => write!(f, "✅ {}", msg),
            Notice::Error(msg) => write!(f, "⚠️ {}", msg),
        }
    }
}

/// Degrade a failed fetch to `T::default()`, logging it and queueing
/// `message` for the user.
pub fn or_default<T: Default>(result: ApiResult<T>, message: &str, notices: &mut Vec<Notice>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            error!(error = %e, "{}", message);
            notices.push(Notice::error(message));
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ApiError;

    #[test]
    fn test_failure_degrades_and_notifies() {
        let mut notices = Vec::new();
        let value: Vec<u32> = or_default(
            Err(ApiError::status("/query-logs/", reqwest::StatusCode::INTERNAL_SERVER_ERROR)),
            "Failed to fetch query logs",
            &mut notices,
        );
        assert!(value.is_empty());
        assert_eq!(notices, vec![Notice::error("Failed to fetch query logs")]);
    }

    #[test]
    fn test_success_passes_through() {
        let mut notices = Vec::new();
        let value = or_default(Ok(3u8), "unused", &mut notices);
        assert_eq!(value, 3);
        assert!(notices.is_empty());
    }
}
