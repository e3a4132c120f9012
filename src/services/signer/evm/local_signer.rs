use alloy::{
    primitives::Address,
    signers::{local::PrivateKeySigner, Signer as AlloySigner},
};
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::{
    models::{ForwardRequestSignature, ForwardRequestTypedData, SignerError},
    services::signer::ForwardRequestSigner,
};

use super::{typed_data_digest, validate_and_format_signature};

/// Signer backed by a raw secp256k1 private key held in memory.
pub struct LocalSigner {
    local_signer_client: PrivateKeySigner,
}

impl LocalSigner {
    /// Creates a signer from a hex private key, with or without the `0x` prefix.
    pub fn from_private_key(private_key: &str) -> Result<Self, SignerError> {
        let key = private_key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);

        let key_bytes = Zeroizing::new(
            hex::decode(key)
                .map_err(|e| SignerError::KeyError(format!("private key is not hex: {e}")))?,
        );
        if key_bytes.len() != 32 {
            return Err(SignerError::KeyError(format!(
                "private key must be 32 bytes, got {}",
                key_bytes.len()
            )));
        }

        let local_signer_client = PrivateKeySigner::from_slice(&key_bytes)
            .map_err(|e| SignerError::KeyError(e.to_string()))?;

        Ok(Self {
            local_signer_client,
        })
    }
}

#[async_trait]
impl ForwardRequestSigner for LocalSigner {
    fn address(&self) -> Address {
        self.local_signer_client.address()
    }

    async fn sign_typed_data(
        &self,
        typed_data: &ForwardRequestTypedData,
    ) -> Result<ForwardRequestSignature, SignerError> {
        let digest = typed_data_digest(typed_data)?;

        let signature = self
            .local_signer_client
            .sign_hash(&digest)
            .await
            .map_err(|e| SignerError::SigningError(format!("Failed to sign typed data: {e}")))?;

        validate_and_format_signature(&signature.as_bytes(), "local signer")
    }
}
