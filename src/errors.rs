use thiserror::Error;

/// Errors surfaced by the backend API client. Every failure is terminal for
/// that one call — the widget never retries.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server returned status {code}")]
    Status { code: u16 },

    #[error("response decode error: {0}")]
    Decode(String),
}
