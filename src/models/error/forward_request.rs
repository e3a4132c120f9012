use alloy::primitives::TxHash;
use thiserror::Error;

use crate::{
    config::ConfigError,
    models::{RelayError, SignerError},
    services::provider::ProviderError,
};

/// Failure of a forward request submission. Each variant is one failure kind of the
/// pipeline; none of them is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForwardRequestError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Chain client error: {0}")]
    ChainClient(#[from] ProviderError),

    #[error("Signer error: {0}")]
    Signer(#[from] SignerError),

    #[error("Signature integrity check failed: {0}")]
    SignatureIntegrity(String),

    #[error("Relay rejected forward request (HTTP {status}): {body}")]
    RelayRejected { status: u16, body: String },

    #[error("Relay error: {0}")]
    Relay(RelayError),

    #[error("Transaction {tx_hash} was not mined within {waited_ms}ms")]
    TransactionTimeout { tx_hash: TxHash, waited_ms: u64 },
}

impl From<RelayError> for ForwardRequestError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::Rejected { status, body } => {
                ForwardRequestError::RelayRejected { status, body }
            }
            other => ForwardRequestError::Relay(other),
        }
    }
}
