use thiserror::Error;

/// Errors from the vote client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport failure (connection refused, DNS, timeout).
    #[error("vote API HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an error body.
    #[error("vote API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Local state file could not be read or written.
    #[error("state file error: {0}")]
    Io(#[from] std::io::Error),

    /// Local state could not be encoded.
    #[error("state encoding error: {0}")]
    Json(#[from] serde_json::Error),
}
