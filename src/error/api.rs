//! API transport error types.
//!
//! This module defines errors that occur while talking to the feed
//! backend and their classification into [`ErrorCategory`] values.

use std::fmt;

use super::category::ErrorCategory;

/// A failed API request.
///
/// Variants preserve the transport detail for logging; user-facing text
/// always comes from the category so every screen shows the same message
/// for the same kind of failure.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// Non-2xx HTTP response.
    Status {
        status: u16,
        message: String,
    },

    /// Connection to the server failed.
    Connection {
        url: String,
        message: String,
    },

    /// The request exceeded the transport timeout.
    Timeout {
        url: String,
    },

    /// The response body could not be decoded.
    Decode {
        message: String,
    },

    /// The request failed before or outside the HTTP exchange.
    Request {
        message: String,
    },
}

impl ApiError {
    /// Classify this error into the closed category set.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::Status { status, .. } => ErrorCategory::from_status(*status),
            ApiError::Connection { .. } => ErrorCategory::Network,
            ApiError::Timeout { .. } => ErrorCategory::Timeout,
            ApiError::Decode { .. } => ErrorCategory::Parse,
            ApiError::Request { .. } => ErrorCategory::Unknown,
        }
    }

    /// The fixed user-facing message for this error's category.
    pub fn user_message(&self) -> &'static str {
        self.category().user_message()
    }

    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Status { .. } => "E_API_STATUS",
            ApiError::Connection { .. } => "E_API_CONN",
            ApiError::Timeout { .. } => "E_API_TIMEOUT",
            ApiError::Decode { .. } => "E_API_DECODE",
            ApiError::Request { .. } => "E_API_REQ",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Status { status, message } => {
                write!(f, "HTTP {} error: {}", status, message)
            }
            ApiError::Connection { url, message } => {
                write!(f, "Connection failed to '{}': {}", url, message)
            }
            ApiError::Timeout { url } => {
                write!(f, "Request to '{}' timed out", url)
            }
            ApiError::Decode { message } => {
                write!(f, "Failed to decode response: {}", message)
            }
            ApiError::Request { message } => {
                write!(f, "Request failed: {}", message)
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Classify a reqwest error into an ApiError.
///
/// Timeouts are checked before connection failures because a connect
/// timeout reports as both.
pub fn classify_reqwest_error(err: &reqwest::Error, url: &str) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout {
            url: url.to_string(),
        }
    } else if err.is_connect() {
        ApiError::Connection {
            url: url.to_string(),
            message: err.to_string(),
        }
    } else if err.is_decode() {
        ApiError::Decode {
            message: err.to_string(),
        }
    } else if let Some(status) = err.status() {
        ApiError::Status {
            status: status.as_u16(),
            message: err.to_string(),
        }
    } else {
        ApiError::Request {
            message: err.to_string(),
        }
    }
}
