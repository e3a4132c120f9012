use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{ForwardRequestSignature, ForwardRequestTypedData, RelayError};

/// Object relayed to the gas relay: the typed data plus its signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardRequestEnvelope {
    pub forward_request: ForwardRequestTypedData,
    pub metadata: EnvelopeMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeMetadata {
    /// Signature hex without the `0x` prefix.
    pub signature: String,
}

impl ForwardRequestEnvelope {
    pub fn new(forward_request: ForwardRequestTypedData, signature: &ForwardRequestSignature) -> Self {
        let signature = signature
            .sig
            .strip_prefix("0x")
            .unwrap_or(&signature.sig)
            .to_string();

        Self {
            forward_request,
            metadata: EnvelopeMetadata { signature },
        }
    }

    /// Encodes the envelope as the `eth_sendRawTransaction` parameter:
    /// `0x` followed by the hex of its compact JSON.
    pub fn to_raw_transaction(&self) -> Result<String, RelayError> {
        let json = serde_json::to_vec(self).map_err(|e| RelayError::Encoding(e.to_string()))?;
        Ok(format!("0x{}", hex::encode(json)))
    }

    /// Decodes an `eth_sendRawTransaction` parameter produced by [`Self::to_raw_transaction`].
    pub fn from_raw_transaction(raw: &str) -> Result<Self, RelayError> {
        let raw = raw.trim();
        let bytes = hex::decode(raw.strip_prefix("0x").unwrap_or(raw))
            .map_err(|e| RelayError::Encoding(format!("raw transaction is not hex: {e}")))?;
        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| RelayError::Encoding(format!("raw transaction is not JSON: {e}")))?;

        let forward_request = ForwardRequestTypedData::from_json(&value["forwardRequest"])
            .map_err(|e| RelayError::Encoding(e.to_string()))?;
        let metadata: EnvelopeMetadata = serde_json::from_value(value["metadata"].clone())
            .map_err(|e| RelayError::Encoding(format!("invalid metadata: {e}")))?;

        Ok(Self {
            forward_request,
            metadata,
        })
    }
}
