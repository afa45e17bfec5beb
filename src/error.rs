use crate::error_code::ErrorKind;
use thiserror::Error;

/// Structured error context for configuration and construction failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Environment variable or config key that caused the error (e.g., "GOOGLE_API_KEY")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected format, actual value)
    pub details: Option<String>,
    /// Component that raised the error (e.g., "config", "http_gateway")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a failed upstream call.
///
/// Only transport and HTTP failures produce an `ApiError`. A 2xx response whose body
/// holds no recoverable text is not an error; the orchestrator resolves it locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("authentication rejected by upstream (HTTP {status})")]
    Auth { status: u16 },

    #[error("upstream quota exceeded (HTTP 429)")]
    QuotaExceeded,

    #[error("upstream rejected the request body (HTTP 400)")]
    BadRequest,

    #[error("upstream server error (HTTP {status})")]
    Server { status: u16 },

    #[error("unexpected upstream status (HTTP {status})")]
    Status { status: u16 },

    #[error("no response within {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("transport failure: {0}")]
    Transport(String),
}

impl ApiError {
    /// Classify a non-2xx status. Returns `None` for success statuses.
    pub fn from_status(status: u16) -> Option<Self> {
        if (200..300).contains(&status) {
            return None;
        }
        let err = match status {
            400 => ApiError::BadRequest,
            401 | 403 => ApiError::Auth { status },
            429 => ApiError::QuotaExceeded,
            500..=599 => ApiError::Server { status },
            _ => ApiError::Status { status },
        };
        Some(err)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Auth { .. } => ErrorKind::Auth,
            ApiError::QuotaExceeded => ErrorKind::QuotaExceeded,
            ApiError::BadRequest => ErrorKind::BadRequest,
            ApiError::Server { .. } => ErrorKind::ServerError,
            ApiError::Status { .. } => ErrorKind::UnexpectedStatus,
            ApiError::Timeout { .. } => ErrorKind::Timeout,
            ApiError::Transport(_) => ErrorKind::Transport,
        }
    }

    /// HTTP status that triggered the error, if the upstream answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Auth { status } | ApiError::Server { status } | ApiError::Status { status } => {
                Some(*status)
            }
            ApiError::QuotaExceeded => Some(429),
            ApiError::BadRequest => Some(400),
            ApiError::Timeout { .. } | ApiError::Transport(_) => None,
        }
    }

    pub fn retryable(&self) -> bool {
        self.kind().retryable()
    }
}

/// Crate-level error for setup paths (configuration, client construction).
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Upstream call failed: {0}")]
    Api(#[from] ApiError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}
