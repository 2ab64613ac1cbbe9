//! Crate-level error types.
//!
//! [`CoinapultError`] folds every failure source (configuration, signing,
//! transport, backend rejections) into the small taxonomy callers are
//! expected to match on, while still supporting the `?` operator for easy
//! propagation.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CoinapultError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum CoinapultError {
    /// Configuration is missing or inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required cryptographic primitive is unavailable. Fatal; retrying
    /// cannot succeed.
    #[error("signing setup failed: {0}")]
    Setup(String),

    /// The backend reports that no account exists for these credentials.
    #[error("account not provisioned")]
    NotProvisioned,

    /// The backend understood the request and rejected it.
    #[error("backend rejected request: {0}")]
    Rejected(String),

    /// Timeout or connectivity failure; safe to retry with backoff.
    #[error("transport failure: {0}")]
    Transient(String),

    /// Any other failure; non-fatal but unresolved.
    #[error("unclassified failure: {0}")]
    Unknown(String),
}

impl CoinapultError {
    /// Fatal errors must be surfaced immediately; no retry can succeed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Setup(_))
    }

    /// Whether a caller-driven retry with backoff can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_) | Self::Rejected(_))
    }
}

impl From<reqwest::Error> for CoinapultError {
    /// Classifies transport-level failures into the domain taxonomy.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            return Self::Transient(err.to_string());
        }
        match err.status() {
            Some(status) if status == reqwest::StatusCode::NOT_FOUND => Self::NotProvisioned,
            Some(status) if status.is_client_error() || status.is_server_error() => {
                Self::Rejected(format!("http status {status}"))
            }
            _ => Self::Unknown(err.to_string()),
        }
    }
}
