//! Error category classification for user messaging.
//!
//! Transport and HTTP outcomes collapse into a closed set of categories,
//! each with a fixed user-facing message. The mapping is pure and has no
//! state, so every layer that needs to show an error agrees on the text.

use std::fmt;

/// High-level categorization of request failures.
///
/// Categories enable consistent:
/// - User messaging (one fixed string per category)
/// - Retry decisions (transient vs. permanent failures)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection-level failures (refused, DNS, unreachable).
    Network,

    /// Backend errors (HTTP 5xx and any other unexpected status).
    Server,

    /// HTTP 401, the session is not authenticated.
    Unauthorized,

    /// HTTP 403, the action is not permitted.
    Forbidden,

    /// HTTP 404, the resource does not exist.
    NotFound,

    /// The response body could not be decoded.
    Parse,

    /// The request exceeded the transport timeout.
    Timeout,

    /// Anything that fits no other category.
    Unknown,
}

impl ErrorCategory {
    /// Map an HTTP status code to its category.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorCategory::Unauthorized,
            403 => ErrorCategory::Forbidden,
            404 => ErrorCategory::NotFound,
            _ => ErrorCategory::Server,
        }
    }

    /// Returns true if errors in this category are generally transient
    /// and the operation can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCategory::Network | ErrorCategory::Server | ErrorCategory::Timeout
        )
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Server => "server",
            ErrorCategory::Unauthorized => "unauthorized",
            ErrorCategory::Forbidden => "forbidden",
            ErrorCategory::NotFound => "not-found",
            ErrorCategory::Parse => "parse",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Unknown => "unknown",
        }
    }

    /// Returns the fixed user-facing message for the category.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "网络连接失败，请检查网络设置",
            ErrorCategory::Server => "服务器错误，请稍后重试",
            ErrorCategory::Unauthorized => "未授权，请重新登录",
            ErrorCategory::Forbidden => "禁止访问，权限不足",
            ErrorCategory::NotFound => "请求的资源不存在",
            ErrorCategory::Parse => "数据解析错误，请稍后重试",
            ErrorCategory::Timeout => "请求超时，请稍后重试",
            ErrorCategory::Unknown => "未知错误，请稍后重试",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
