use alloy::primitives::Address;
use async_trait::async_trait;

use crate::models::{ForwardRequestSignature, ForwardRequestTypedData, SignerError};

#[cfg(test)]
use mockall::automock;

pub mod evm;
pub use evm::*;

/// Signs forward request typed data with a single account.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait ForwardRequestSigner: Send + Sync {
    /// Address of the signing account. This is the forward request's `from`.
    fn address(&self) -> Address;

    /// Produces a 65-byte EIP-712 signature over `typed_data`.
    async fn sign_typed_data(
        &self,
        typed_data: &ForwardRequestTypedData,
    ) -> Result<ForwardRequestSignature, SignerError>;

    /// Recovers the address that produced `signature` over `typed_data`.
    fn recover_address(
        &self,
        typed_data: &ForwardRequestTypedData,
        signature: &ForwardRequestSignature,
    ) -> Result<Address, SignerError> {
        recover_typed_data_signer(typed_data, signature)
    }
}
