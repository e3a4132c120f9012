//! # EVM typed data signing
//!
//! EIP-712 hashing and signature recovery for forward requests, plus the local
//! private-key signer.
//!
//! The digest is
//!
//! ```text
//! keccak256("\x19\x01" ‖ domainSeparator ‖ hashStruct(message))
//! ```
//!
//! where both hashes are computed by `alloy-dyn-abi` from the same JSON that is sent to
//! the relay, so the relay and the forwarder contract re-derive exactly what was signed.

mod local_signer;
pub use local_signer::*;

use alloy::primitives::{keccak256, Address, Signature, B256};
use alloy_dyn_abi::TypedData;

use crate::models::{ForwardRequestSignature, ForwardRequestTypedData, SignerError};

const EIP712_PREFIX: [u8; 2] = [0x19, 0x01];
const EIP712_MESSAGE_SIZE: usize = 66; // 2 (prefix) + 32 (domain) + 32 (struct)

/// SECP256K1 signature length: 32 bytes (r) + 32 bytes (s) + 1 byte (v)
const SECP256K1_SIGNATURE_LENGTH: usize = 65;

/// Converts forward request typed data into `alloy-dyn-abi`'s dynamic representation.
pub fn to_dyn_typed_data(typed_data: &ForwardRequestTypedData) -> Result<TypedData, SignerError> {
    serde_json::from_value(typed_data.to_signing_json())
        .map_err(|e| SignerError::TypedDataError(e.to_string()))
}

/// Encoded type string of the primary type, e.g.
/// `Message(address from,...,bytes32 ABCDEFGHIJKLMNOPQRSTGSN)`.
pub fn encode_primary_type(typed_data: &ForwardRequestTypedData) -> Result<String, SignerError> {
    to_dyn_typed_data(typed_data)?
        .encode_type()
        .map_err(|e| SignerError::TypedDataError(e.to_string()))
}

/// Builds the final EIP-712 message hash from its two component hashes.
pub fn construct_eip712_message_hash(domain_separator: B256, struct_hash: B256) -> B256 {
    let mut eip712_message = [0u8; EIP712_MESSAGE_SIZE];
    eip712_message[0..2].copy_from_slice(&EIP712_PREFIX);
    eip712_message[2..34].copy_from_slice(domain_separator.as_slice());
    eip712_message[34..66].copy_from_slice(struct_hash.as_slice());

    keccak256(eip712_message)
}

/// EIP-712 signing digest of a forward request.
pub fn typed_data_digest(typed_data: &ForwardRequestTypedData) -> Result<B256, SignerError> {
    let typed = to_dyn_typed_data(typed_data)?;
    let struct_hash = typed
        .hash_struct()
        .map_err(|e| SignerError::TypedDataError(e.to_string()))?;

    Ok(construct_eip712_message_hash(
        typed.domain.separator(),
        struct_hash,
    ))
}

/// Recovers the signer of `signature` over `typed_data`.
pub fn recover_typed_data_signer(
    typed_data: &ForwardRequestTypedData,
    signature: &ForwardRequestSignature,
) -> Result<Address, SignerError> {
    let digest = typed_data_digest(typed_data)?;
    let bytes = signature.to_bytes()?;

    let signature = Signature::try_from(bytes.as_slice())
        .map_err(|e| SignerError::InvalidSignature(e.to_string()))?;

    signature
        .recover_address_from_prehash(&digest)
        .map_err(|e| SignerError::InvalidSignature(format!("recovery failed: {e}")))
}

/// Validates signature length and splits it into its `r`, `s` and `v` parts.
///
/// # Arguments
/// * `signature_bytes` - The raw signature bytes (expected to be 65 bytes: r + s + v)
/// * `signer_name` - Name of the signer for error messages
pub(crate) fn validate_and_format_signature(
    signature_bytes: &[u8],
    signer_name: &str,
) -> Result<ForwardRequestSignature, SignerError> {
    if signature_bytes.len() != SECP256K1_SIGNATURE_LENGTH {
        return Err(SignerError::SigningError(format!(
            "Invalid signature length from {}: expected {} bytes, got {}",
            signer_name,
            SECP256K1_SIGNATURE_LENGTH,
            signature_bytes.len()
        )));
    }

    Ok(ForwardRequestSignature {
        r: hex::encode(&signature_bytes[0..32]),
        s: hex::encode(&signature_bytes[32..64]),
        v: signature_bytes[64],
        sig: hex::encode(signature_bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldValue, ForwardRequestDomain, TypedField};
    use alloy::primitives::{address, Bytes};

    fn typed_data() -> ForwardRequestTypedData {
        ForwardRequestTypedData {
            domain: ForwardRequestDomain {
                name: "domain".to_string(),
                version: "1".to_string(),
                chain_id: 43113,
                verifying_contract: address!("5fbdb2315678afecb367f032d93f642f64180aa3"),
            },
            primary_type: "Message".to_string(),
            fields: vec![
                TypedField::new(
                    "from",
                    "address",
                    FieldValue::Address(address!("7e5f4552091a69125d5dfcb7b8c2659029395bdf")),
                ),
                TypedField::new("nonce", "uint256", FieldValue::quantity(3u64)),
                TypedField::new(
                    "data",
                    "bytes",
                    FieldValue::Bytes(Bytes::from_static(&[0xd0, 0x9d, 0xe0, 0x8a])),
                ),
                TypedField::new(
                    "ABCDEFGHIJKLMNOPQRSTGSN",
                    "bytes32",
                    FieldValue::RawBytes(Bytes::from_static(b"bytes32 ABCDEFGHIJKLMNOPQRSTGSN)")),
                ),
            ],
        }
    }

    #[test]
    fn test_digest_matches_alloy_signing_hash() {
        let typed_data = typed_data();
        let expected = to_dyn_typed_data(&typed_data)
            .unwrap()
            .eip712_signing_hash()
            .unwrap();

        assert_eq!(typed_data_digest(&typed_data).unwrap(), expected);
    }

    #[test]
    fn test_encoded_type_ends_with_suffix_value() {
        let encoded = encode_primary_type(&typed_data()).unwrap();

        assert_eq!(
            encoded,
            "Message(address from,uint256 nonce,bytes data,bytes32 ABCDEFGHIJKLMNOPQRSTGSN)"
        );
        assert!(encoded.ends_with("bytes32 ABCDEFGHIJKLMNOPQRSTGSN)"));
    }

    #[test]
    fn test_digest_depends_on_chain_id() {
        let typed_data = typed_data();
        let mut other_chain = typed_data.clone();
        other_chain.domain.chain_id = 43114;

        assert_ne!(
            typed_data_digest(&typed_data).unwrap(),
            typed_data_digest(&other_chain).unwrap()
        );
    }

    #[test]
    fn test_construct_eip712_message_hash_layout() {
        let domain = B256::repeat_byte(0xaa);
        let struct_hash = B256::repeat_byte(0xbb);

        let mut expected = vec![0x19, 0x01];
        expected.extend_from_slice(domain.as_slice());
        expected.extend_from_slice(struct_hash.as_slice());

        assert_eq!(
            construct_eip712_message_hash(domain, struct_hash),
            keccak256(&expected)
        );
    }

    #[test]
    fn test_validate_and_format_signature() {
        let mut bytes = vec![0x11; 32];
        bytes.extend_from_slice(&[0x22; 32]);
        bytes.push(28);

        let signature = validate_and_format_signature(&bytes, "test").unwrap();

        assert_eq!(signature.r, "11".repeat(32));
        assert_eq!(signature.s, "22".repeat(32));
        assert_eq!(signature.v, 28);
        assert_eq!(signature.sig, hex::encode(&bytes));
    }

    #[test]
    fn test_validate_and_format_signature_rejects_wrong_length() {
        let err = validate_and_format_signature(&[0u8; 64], "test").unwrap_err();

        assert_eq!(
            err,
            SignerError::SigningError(
                "Invalid signature length from test: expected 65 bytes, got 64".to_string()
            )
        );
    }

    #[test]
    fn test_recover_rejects_malformed_signature() {
        let signature = ForwardRequestSignature {
            r: String::new(),
            s: String::new(),
            v: 0,
            sig: "abcd".to_string(),
        };

        let err = recover_typed_data_signer(&typed_data(), &signature).unwrap_err();

        assert!(matches!(err, SignerError::InvalidSignature(_)));
    }
}
