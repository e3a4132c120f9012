use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// The relay answered with a non-success HTTP status or a JSON-RPC error.
    /// `body` is the raw response payload, kept verbatim for diagnostics.
    #[error("Relay rejected forward request (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Relay request failed: {0}")]
    Transport(String),

    #[error("Invalid relay response: {0}")]
    InvalidResponse(String),

    #[error("Forward request encoding error: {0}")]
    Encoding(String),

    #[error("Relay client configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return RelayError::Transport(format!("request timed out: {err}"));
        }
        RelayError::Transport(err.to_string())
    }
}
