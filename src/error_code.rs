//! 上游调用错误分类：为每类失败提供稳定的错误码与重试语义。
//!
//! Error kinds for upstream calls.
//!
//! Every [`ApiError`](crate::error::ApiError) maps to exactly one kind. Kinds carry a
//! stable code for log correlation and a default retry hint. The crate itself never
//! retries; callers decide.
//!
//! | Prefix | Category  | Description                       |
//! |--------|-----------|-----------------------------------|
//! | E1xxx  | client    | Request-side or credential errors |
//! | E2xxx  | rate      | Quota errors                      |
//! | E3xxx  | server    | Provider-side errors and timeouts |
//! | E4xxx  | network   | Connection failures               |
//! | E9xxx  | unknown   | Unclassified statuses             |
//!
//! ## Example
//!
//! ```rust
//! use tripmate::error_code::ErrorKind;
//!
//! let kind = ErrorKind::from_http_status(429).unwrap();
//! assert_eq!(kind.code(), "E2001");
//! assert!(kind.retryable());
//! assert_eq!(kind.category(), "rate");
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// E1001: Body rejected as malformed
    BadRequest,
    /// E1002: Invalid, expired, or unauthorized API key
    Auth,
    /// E2001: Usage quota or rate limit reached
    QuotaExceeded,
    /// E3001: Internal error on provider side
    ServerError,
    /// E3002: No response within the configured duration
    Timeout,
    /// E4001: Connection or network failure
    Transport,
    /// E9999: Non-2xx status without a dedicated kind
    UnexpectedStatus,
}

impl ErrorKind {
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest => "E1001",
            Self::Auth => "E1002",
            Self::QuotaExceeded => "E2001",
            Self::ServerError => "E3001",
            Self::Timeout => "E3002",
            Self::Transport => "E4001",
            Self::UnexpectedStatus => "E9999",
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::Auth => "auth_error",
            Self::QuotaExceeded => "quota_exceeded",
            Self::ServerError => "server_error",
            Self::Timeout => "timeout",
            Self::Transport => "transport",
            Self::UnexpectedStatus => "unexpected_status",
        }
    }

    /// Whether a caller may reasonably retry (with backoff).
    #[inline]
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            Self::QuotaExceeded | Self::ServerError | Self::Timeout | Self::Transport
        )
    }

    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::BadRequest | Self::Auth => "client",
            Self::QuotaExceeded => "rate",
            Self::ServerError | Self::Timeout => "server",
            Self::Transport => "network",
            Self::UnexpectedStatus => "unknown",
        }
    }

    /// Maps an HTTP status to its kind. 2xx statuses have no kind.
    pub fn from_http_status(status: u16) -> Option<Self> {
        let kind = match status {
            200..=299 => return None,
            400 => Self::BadRequest,
            401 | 403 => Self::Auth,
            429 => Self::QuotaExceeded,
            500..=599 => Self::ServerError,
            _ => Self::UnexpectedStatus,
        };
        Some(kind)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn test_kind_agrees_with_api_error() {
        for status in [400u16, 401, 403, 404, 418, 429, 500, 503, 599] {
            let from_kind = ErrorKind::from_http_status(status);
            let from_err = ApiError::from_status(status).map(|e| e.kind());
            assert_eq!(from_kind, from_err, "status {}", status);
        }
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(ErrorKind::Timeout.retryable());
        assert!(ErrorKind::Transport.retryable());
        assert!(ErrorKind::ServerError.retryable());
        assert!(ErrorKind::QuotaExceeded.retryable());
        assert!(!ErrorKind::Auth.retryable());
        assert!(!ErrorKind::BadRequest.retryable());
        assert!(!ErrorKind::UnexpectedStatus.retryable());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorKind::Auth.to_string(), "auth_error (E1002)");
    }
}
