use serde::{Deserialize, Serialize};

use crate::models::SignerError;

/// 65-byte ECDSA signature over a forward request digest.
///
/// `r`, `s` and `sig` are hex without the `0x` prefix; `v` is 27 or 28.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardRequestSignature {
    pub r: String,
    pub s: String,
    pub v: u8,
    pub sig: String,
}

impl ForwardRequestSignature {
    /// Parses a 65-byte `r ‖ s ‖ v` signature from hex, with or without `0x`.
    pub fn from_hex(signature: &str) -> Result<Self, SignerError> {
        let signature = signature.trim();
        let sig = signature.strip_prefix("0x").unwrap_or(signature).to_lowercase();
        let bytes = decode_signature(&sig)?;

        Ok(Self {
            r: hex::encode(&bytes[0..32]),
            s: hex::encode(&bytes[32..64]),
            v: bytes[64],
            sig,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SignerError> {
        decode_signature(&self.sig)
    }
}

fn decode_signature(sig: &str) -> Result<Vec<u8>, SignerError> {
    let bytes = hex::decode(sig)
        .map_err(|e| SignerError::InvalidSignature(format!("invalid hex: {e}")))?;
    if bytes.len() != 65 {
        return Err(SignerError::InvalidSignature(format!(
            "expected 65 bytes, got {}",
            bytes.len()
        )));
    }
    Ok(bytes)
}
