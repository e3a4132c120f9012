use alloy::primitives::Address;
use serde::Serializer;

/// Serializes an address in its EIP-55 mixed-case form.
pub fn serialize_checksum_address<S>(address: &Address, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&address.to_checksum(None))
}
