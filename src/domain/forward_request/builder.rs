//! Assembly of forward request typed data.
//!
//! The builder is pure: the same parameters always produce the same typed data. It only
//! validates what would otherwise silently corrupt the schema.

use alloy::primitives::{Address, Bytes, U256};

use crate::{
    config::ConfigError,
    constants::{
        EIP712_DOMAIN_TYPE, FORWARD_REQUEST_FIELDS, FORWARD_REQUEST_VALUE, MAX_FIXED_BYTES_LENGTH,
        VALID_UNTIL_TIME_UNBOUNDED,
    },
    models::{
        FieldValue, ForwardRequestDomain, ForwardRequestTypedData, RequestTypeConfig, TypedField,
    },
};

/// Inputs of a single forward request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardRequestParams {
    pub domain_name: String,
    pub domain_version: String,
    pub chain_id: u64,
    /// Forwarder contract, used as the domain's `verifyingContract`.
    pub forwarder: Address,
    /// Call payload executed on `to`.
    pub call_data: Bytes,
    pub from: Address,
    pub to: Address,
    pub gas: u64,
    pub nonce: U256,
    pub request_type: RequestTypeConfig,
}

/// Builds the typed data for a forward request.
///
/// Fields are emitted in the fixed order `from, to, value, gas, nonce, data,
/// validUntilTime`, followed by the configured suffix field.
pub fn build_forward_request(
    params: &ForwardRequestParams,
) -> Result<ForwardRequestTypedData, ConfigError> {
    validate_params(params)?;

    let suffix = &params.request_type;
    let message_values = [
        FieldValue::Address(params.from),
        FieldValue::Address(params.to),
        FieldValue::Quantity(FORWARD_REQUEST_VALUE.to_string()),
        FieldValue::quantity(params.gas),
        FieldValue::quantity(params.nonce),
        FieldValue::Bytes(params.call_data.clone()),
        FieldValue::Quantity(VALID_UNTIL_TIME_UNBOUNDED.to_string()),
    ];

    let mut fields: Vec<TypedField> = FORWARD_REQUEST_FIELDS
        .iter()
        .zip(message_values)
        .map(|((name, type_name), value)| TypedField::new(*name, *type_name, value))
        .collect();
    fields.push(TypedField::new(
        suffix.suffix_name.clone(),
        suffix.suffix_type.clone(),
        FieldValue::RawBytes(request_suffix(suffix)),
    ));

    Ok(ForwardRequestTypedData {
        domain: ForwardRequestDomain {
            name: params.domain_name.clone(),
            version: params.domain_version.clone(),
            chain_id: params.chain_id,
            verifying_contract: params.forwarder,
        },
        primary_type: suffix.primary_type.clone(),
        fields,
    })
}

/// Raw value of the suffix field, see [`RequestTypeConfig::suffix_value`].
pub fn request_suffix(request_type: &RequestTypeConfig) -> Bytes {
    Bytes::from(request_type.suffix_value())
}

fn validate_params(params: &ForwardRequestParams) -> Result<(), ConfigError> {
    let request_type = &params.request_type;
    let required = [
        ("domain name", &params.domain_name),
        ("domain version", &params.domain_version),
        ("request type", &request_type.primary_type),
        ("suffix type", &request_type.suffix_type),
        ("suffix name", &request_type.suffix_name),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingValue(name.to_string()));
        }
    }

    if request_type.primary_type == EIP712_DOMAIN_TYPE {
        return Err(ConfigError::invalid(
            "request type",
            format!("'{EIP712_DOMAIN_TYPE}' is reserved"),
        ));
    }

    if FORWARD_REQUEST_FIELDS
        .iter()
        .any(|(name, _)| request_type.suffix_name == *name)
    {
        return Err(ConfigError::invalid(
            "suffix name",
            format!(
                "'{}' is already a forward request field",
                request_type.suffix_name
            ),
        ));
    }

    validate_identifier("request type", &request_type.primary_type)?;
    validate_identifier("suffix name", &request_type.suffix_name)?;
    validate_suffix_type(request_type)
}

fn validate_identifier(field: &str, value: &str) -> Result<(), ConfigError> {
    let valid = value
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid {
        return Err(ConfigError::invalid(
            field,
            format!("'{value}' is not a valid identifier"),
        ));
    }
    Ok(())
}

// The suffix value is raw bytes, so it can only be declared as `bytes` or as a
// `bytesN` whose width matches the value exactly.
fn validate_suffix_type(request_type: &RequestTypeConfig) -> Result<(), ConfigError> {
    let suffix_type = request_type.suffix_type.as_str();
    if suffix_type == "bytes" {
        return Ok(());
    }

    let width = suffix_type
        .strip_prefix("bytes")
        .and_then(|n| n.parse::<usize>().ok())
        .filter(|n| (1..=MAX_FIXED_BYTES_LENGTH).contains(n))
        .ok_or_else(|| {
            ConfigError::invalid(
                "suffix type",
                format!("'{suffix_type}' must be 'bytes' or 'bytes1'..'bytes32'"),
            )
        })?;

    let value_len = request_type.suffix_value().len();
    if value_len != width {
        return Err(ConfigError::invalid(
            "suffix type",
            format!(
                "'{suffix_type}' holds {width} bytes but '{} {})' is {value_len} bytes",
                request_type.suffix_type, request_type.suffix_name
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signer::{encode_primary_type, typed_data_digest};
    use alloy::primitives::address;
    use proptest::prelude::*;

    const FORWARDER: Address = address!("5fbdb2315678afecb367f032d93f642f64180aa3");
    const SIGNER: Address = address!("7e5f4552091a69125d5dfcb7b8c2659029395bdf");
    const TARGET: Address = address!("e7f1725e7734ce288f8367e1bb143e90bb3f0512");

    fn request_type() -> RequestTypeConfig {
        RequestTypeConfig {
            primary_type: "ForwardRequest".to_string(),
            suffix_type: "bytes32".to_string(),
            suffix_name: "ABCDEFGHIJKLMNOPQRSTGSN".to_string(),
        }
    }

    fn params() -> ForwardRequestParams {
        ForwardRequestParams {
            domain_name: "D".to_string(),
            domain_version: "1".to_string(),
            chain_id: 31337,
            forwarder: FORWARDER,
            call_data: Bytes::from_static(&[0xd0, 0x9d, 0xe0, 0x8a]),
            from: SIGNER,
            to: TARGET,
            gas: 21000,
            nonce: U256::ZERO,
            request_type: request_type(),
        }
    }

    #[test]
    fn test_build_scenario_message_values() {
        let typed_data = build_forward_request(&params()).unwrap();

        assert_eq!(typed_data.primary_type, "ForwardRequest");
        assert_eq!(typed_data.domain.name, "D");
        assert_eq!(typed_data.domain.version, "1");
        assert_eq!(typed_data.domain.chain_id, 31337);
        assert_eq!(typed_data.domain.verifying_contract, FORWARDER);

        assert_eq!(typed_data.field("from"), Some(&FieldValue::Address(SIGNER)));
        assert_eq!(typed_data.field("to"), Some(&FieldValue::Address(TARGET)));
        assert_eq!(typed_data.field("value"), Some(&FieldValue::Quantity("0x0".into())));
        assert_eq!(typed_data.field("gas"), Some(&FieldValue::Quantity("0x5208".into())));
        assert_eq!(typed_data.field("nonce"), Some(&FieldValue::Quantity("0x0".into())));
        assert_eq!(
            typed_data.field("validUntilTime").and_then(FieldValue::as_quantity),
            Some(U256::MAX)
        );
        assert_eq!(
            typed_data.field("data").and_then(FieldValue::as_bytes),
            Some(&Bytes::from_static(&[0xd0, 0x9d, 0xe0, 0x8a]))
        );
    }

    #[test]
    fn test_field_order_and_types() {
        let typed_data = build_forward_request(&params()).unwrap();
        let types = typed_data.types();

        assert_eq!(
            types.names().collect::<Vec<_>>(),
            ["EIP712Domain", "ForwardRequest"]
        );

        let primary: Vec<(&str, &str)> = types
            .get("ForwardRequest")
            .unwrap()
            .iter()
            .map(|p| (p.name.as_str(), p.type_name.as_str()))
            .collect();
        assert_eq!(
            primary,
            [
                ("from", "address"),
                ("to", "address"),
                ("value", "uint256"),
                ("gas", "uint256"),
                ("nonce", "uint256"),
                ("data", "bytes"),
                ("validUntilTime", "uint256"),
                ("ABCDEFGHIJKLMNOPQRSTGSN", "bytes32"),
            ]
        );

        let domain: Vec<&str> = types
            .get("EIP712Domain")
            .unwrap()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(domain, ["name", "version", "chainId", "verifyingContract"]);
    }

    #[test]
    fn test_suffix_construction() {
        let suffix = request_suffix(&request_type());

        assert_eq!(suffix.as_ref(), b"bytes32 ABCDEFGHIJKLMNOPQRSTGSN)");

        let typed_data = build_forward_request(&params()).unwrap();
        assert_eq!(
            typed_data.field("ABCDEFGHIJKLMNOPQRSTGSN"),
            Some(&FieldValue::RawBytes(suffix))
        );
    }

    #[test]
    fn test_suffix_matches_encoded_type_tail() {
        let typed_data = build_forward_request(&params()).unwrap();

        let encoded = encode_primary_type(&typed_data).unwrap();

        assert!(encoded.starts_with("ForwardRequest(address from,address to,uint256 value,"));
        assert!(encoded.ends_with("bytes32 ABCDEFGHIJKLMNOPQRSTGSN)"));
    }

    #[test]
    fn test_field_order_changes_digest() {
        let typed_data = build_forward_request(&params()).unwrap();
        let digest = typed_data_digest(&typed_data).unwrap();

        for (a, b) in [(0, 1), (2, 3), (3, 4), (5, 6)] {
            let mut permuted = typed_data.clone();
            permuted.fields.swap(a, b);

            assert_ne!(
                typed_data_digest(&permuted).unwrap(),
                digest,
                "swapping fields {a} and {b} kept the digest"
            );
        }
    }

    #[test]
    fn test_missing_values_are_configuration_errors() {
        let mut missing_domain = params();
        missing_domain.domain_name = String::new();
        assert_eq!(
            build_forward_request(&missing_domain).unwrap_err(),
            ConfigError::MissingValue("domain name".to_string())
        );

        let mut missing_suffix = params();
        missing_suffix.request_type.suffix_name = "  ".to_string();
        assert_eq!(
            build_forward_request(&missing_suffix).unwrap_err(),
            ConfigError::MissingValue("suffix name".to_string())
        );

        let mut missing_type = params();
        missing_type.request_type.primary_type = String::new();
        assert_eq!(
            build_forward_request(&missing_type).unwrap_err(),
            ConfigError::MissingValue("request type".to_string())
        );
    }

    #[test]
    fn test_suffix_name_cannot_shadow_fixed_fields() {
        let mut params = params();
        params.request_type.suffix_type = "bytes".to_string();
        params.request_type.suffix_name = "nonce".to_string();

        let err = build_forward_request(&params).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "suffix name"));
    }

    #[test]
    fn test_reserved_primary_type_is_rejected() {
        let mut params = params();
        params.request_type.primary_type = "EIP712Domain".to_string();

        assert!(build_forward_request(&params).is_err());
    }

    #[test]
    fn test_suffix_type_must_fit_value() {
        let mut too_wide = params();
        too_wide.request_type.suffix_name = "SHORT".to_string();
        let err = build_forward_request(&too_wide).unwrap_err();
        assert!(err.to_string().contains("holds 32 bytes"));

        let mut not_bytes = params();
        not_bytes.request_type.suffix_type = "uint256".to_string();
        assert!(build_forward_request(&not_bytes).is_err());

        let mut dynamic = params();
        dynamic.request_type.suffix_type = "bytes".to_string();
        dynamic.request_type.suffix_name = "SHORT".to_string();
        let typed_data = build_forward_request(&dynamic).unwrap();
        assert_eq!(
            typed_data.field("SHORT").and_then(FieldValue::as_bytes),
            Some(&Bytes::from_static(b"bytes SHORT)"))
        );
    }

    proptest! {
        #[test]
        fn prop_builder_is_deterministic(
            chain_id in 1u64..u64::MAX,
            gas in 0u64..30_000_000,
            nonce in any::<u64>(),
            from in any::<[u8; 20]>(),
        ) {
            let mut params = params();
            params.chain_id = chain_id;
            params.gas = gas;
            params.nonce = U256::from(nonce);
            params.from = Address::from(from);

            let first = build_forward_request(&params).unwrap();
            let second = build_forward_request(&params).unwrap();

            prop_assert_eq!(
                serde_json::to_vec(&first).unwrap(),
                serde_json::to_vec(&second).unwrap()
            );
            prop_assert_eq!(
                first.field("gas").and_then(FieldValue::as_quantity),
                Some(U256::from(gas))
            );
            prop_assert_eq!(
                first.field("nonce").and_then(FieldValue::as_quantity),
                Some(U256::from(nonce))
            );
        }
    }
}
