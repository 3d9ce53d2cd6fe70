use thiserror::Error;

/// Result type alias for lsmon operations
pub type Result<T> = std::result::Result<T, LsmonError>;

/// Errors that can occur while monitoring or remediating nodes
#[derive(Error, Debug)]
pub enum LsmonError {
    /// Authentication failed - invalid or missing API token
    #[error("authentication failed: invalid API token")]
    Unauthorized,

    /// Resource not found on the provider side
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// The per-region reserved-address quota is exhausted
    #[error("static address quota exceeded in region {region}")]
    QuotaExceeded {
        /// Region whose quota was hit
        region: String,
    },

    /// Provider API returned an error response
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the API
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Request timed out
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Connection failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An instance reported no usable public address
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// DNS record update failed
    #[error("DNS update failed: {0}")]
    Dns(String),

    /// Notification delivery failed
    #[error("notification failed: {0}")]
    Notify(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl LsmonError {
    /// Returns true if the error is transient and worth retrying
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::Connection(_) | Self::Http(_)
        )
    }

    /// Returns the HTTP status code if this is an API error
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::QuotaExceeded { .. } => Some(409),
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
