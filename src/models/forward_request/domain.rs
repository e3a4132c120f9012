use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{
    constants::EIP712_DOMAIN_FIELDS,
    models::TypeProperty,
    utils::{deserialize_chain_id, serialize_checksum_address},
};

/// EIP-712 domain of the forwarder contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardRequestDomain {
    pub name: String,
    pub version: String,
    #[serde(deserialize_with = "deserialize_chain_id")]
    pub chain_id: u64,
    #[serde(serialize_with = "serialize_checksum_address")]
    pub verifying_contract: Address,
}

impl ForwardRequestDomain {
    /// `EIP712Domain` type entry matching this domain.
    pub fn type_properties() -> Vec<TypeProperty> {
        EIP712_DOMAIN_FIELDS
            .iter()
            .map(|(name, type_name)| TypeProperty::new(*name, *type_name))
            .collect()
    }
}
