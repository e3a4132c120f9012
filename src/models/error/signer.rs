use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignerError {
    #[error("Invalid signing key: {0}")]
    KeyError(String),

    #[error("Failed to sign: {0}")]
    SigningError(String),

    #[error("Typed data cannot be hashed: {0}")]
    TypedDataError(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
}
