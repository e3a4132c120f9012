//! Ordered representation of the forward request typed data.
//!
//! Field order in both the type schema and the message is part of the signed
//! commitment, so everything here is kept in ordered lists and serialized by hand
//! rather than through maps.
use std::{fmt, str::FromStr};

use alloy::primitives::{Address, Bytes, U256};
use serde::{
    ser::{SerializeMap, SerializeStruct},
    Deserialize, Serialize, Serializer,
};
use serde_json::{json, Map, Value};

use crate::{
    constants::EIP712_DOMAIN_TYPE,
    models::{ForwardRequestDomain, TypedDataError},
    utils::{deserialize_node_buffer, serialize_node_buffer},
};

/// A `(name, type)` entry of a typed-data struct definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl TypeProperty {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Type definitions keyed by type name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSchema(Vec<(String, Vec<TypeProperty>)>);

impl TypeSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a type definition, replacing an existing one with the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, properties: Vec<TypeProperty>) {
        let name = name.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = properties,
            None => self.0.push((name, properties)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[TypeProperty]> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, properties)| properties.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for TypeSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, properties) in &self.0 {
            map.serialize_entry(name, properties)?;
        }
        map.end()
    }
}

/// Value of a single message field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Address(Address),
    /// Unsigned integer as a `0x`-prefixed hex quantity.
    Quantity(String),
    Bytes(Bytes),
    /// Raw bytes that travel as a Node.js `Buffer` object in the envelope.
    RawBytes(Bytes),
}

impl FieldValue {
    /// Minimal hex quantity, e.g. `0x0` or `0x5208`.
    pub fn quantity<T: fmt::LowerHex>(value: T) -> Self {
        FieldValue::Quantity(format!("0x{value:x}"))
    }

    pub fn as_quantity(&self) -> Option<U256> {
        match self {
            FieldValue::Quantity(quantity) => U256::from_str(quantity).ok(),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            FieldValue::Address(address) => Some(*address),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            FieldValue::Bytes(bytes) | FieldValue::RawBytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// JSON form consumed by EIP-712 hashing. Byte values are always `0x` hex here.
    pub fn to_signing_value(&self) -> Value {
        match self {
            FieldValue::Address(address) => Value::String(address.to_checksum(None)),
            FieldValue::Quantity(quantity) => Value::String(quantity.clone()),
            FieldValue::Bytes(bytes) | FieldValue::RawBytes(bytes) => {
                Value::String(format!("0x{}", hex::encode(bytes)))
            }
        }
    }

    /// Reads a field value back from its envelope JSON form.
    pub fn from_json(field: &str, type_name: &str, raw: &Value) -> Result<Self, TypedDataError> {
        let invalid = |reason: String| TypedDataError::InvalidValue {
            field: field.to_string(),
            reason,
        };

        if raw.is_object() {
            let bytes = deserialize_node_buffer(raw).map_err(|e| invalid(e.to_string()))?;
            return Ok(FieldValue::RawBytes(bytes.into()));
        }

        let text = raw
            .as_str()
            .map(str::to_string)
            .or_else(|| raw.as_u64().map(|n| n.to_string()))
            .ok_or_else(|| invalid(format!("unexpected JSON value {raw}")))?;

        match type_name {
            "address" => Address::from_str(&text)
                .map(FieldValue::Address)
                .map_err(|e| invalid(e.to_string())),
            t if t.starts_with("uint") => {
                if text.starts_with("0x") {
                    U256::from_str(&text).map_err(|e| invalid(e.to_string()))?;
                    Ok(FieldValue::Quantity(text))
                } else {
                    U256::from_str(&text)
                        .map(FieldValue::quantity)
                        .map_err(|e| invalid(e.to_string()))
                }
            }
            t if t.starts_with("bytes") => Bytes::from_str(&text)
                .map(FieldValue::Bytes)
                .map_err(|e| invalid(e.to_string())),
            other => Err(TypedDataError::UnsupportedType {
                field: field.to_string(),
                type_name: other.to_string(),
            }),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Address(address) => serializer.serialize_str(&address.to_checksum(None)),
            FieldValue::Quantity(quantity) => serializer.serialize_str(quantity),
            FieldValue::Bytes(bytes) => bytes.serialize(serializer),
            FieldValue::RawBytes(bytes) => serialize_node_buffer(bytes, serializer),
        }
    }
}

/// A message field together with its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedField {
    pub name: String,
    pub type_name: String,
    pub value: FieldValue,
}

impl TypedField {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            value,
        }
    }

    pub fn property(&self) -> TypeProperty {
        TypeProperty::new(self.name.clone(), self.type_name.clone())
    }
}

/// Message body view that serializes fields as an ordered JSON object.
pub struct ForwardRequestMessage<'a>(&'a [TypedField]);

impl Serialize for ForwardRequestMessage<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for field in self.0 {
            map.serialize_entry(&field.name, &field.value)?;
        }
        map.end()
    }
}

/// Complete forward request typed data: `{domain, types, primaryType, message}`.
///
/// The primary type definition is derived from `fields`, so the schema and the message
/// can never disagree on names or order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardRequestTypedData {
    pub domain: ForwardRequestDomain,
    pub primary_type: String,
    pub fields: Vec<TypedField>,
}

impl ForwardRequestTypedData {
    pub fn types(&self) -> TypeSchema {
        let mut types = TypeSchema::new();
        types.insert(EIP712_DOMAIN_TYPE, ForwardRequestDomain::type_properties());
        types.insert(
            self.primary_type.clone(),
            self.fields.iter().map(TypedField::property).collect(),
        );
        types
    }

    pub fn message(&self) -> ForwardRequestMessage<'_> {
        ForwardRequestMessage(&self.fields)
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.fields
            .iter_mut()
            .find(|field| field.name == name)
            .map(|field| &mut field.value)
    }

    /// Typed data in the JSON shape accepted by EIP-712 hashing, with every byte value
    /// written as hex.
    pub fn to_signing_json(&self) -> Value {
        let message: Map<String, Value> = self
            .fields
            .iter()
            .map(|field| (field.name.clone(), field.value.to_signing_value()))
            .collect();

        json!({
            "types": self.types(),
            "primaryType": self.primary_type,
            "domain": self.domain,
            "message": message,
        })
    }

    /// Parses typed data from its envelope JSON form.
    ///
    /// Field order is taken from the primary type definition, not from the message
    /// object. The `EIP712Domain` definition must match the domain fields exactly.
    pub fn from_json(value: &Value) -> Result<Self, TypedDataError> {
        let domain: ForwardRequestDomain = serde_json::from_value(value["domain"].clone())
            .map_err(|e| TypedDataError::InvalidValue {
                field: "domain".to_string(),
                reason: e.to_string(),
            })?;

        let domain_type = value["types"]
            .get(EIP712_DOMAIN_TYPE)
            .ok_or_else(|| TypedDataError::MissingField(format!("types.{EIP712_DOMAIN_TYPE}")))?;
        let domain_properties: Vec<TypeProperty> = serde_json::from_value(domain_type.clone())
            .map_err(|e| TypedDataError::InvalidValue {
                field: format!("types.{EIP712_DOMAIN_TYPE}"),
                reason: e.to_string(),
            })?;
        if domain_properties != ForwardRequestDomain::type_properties() {
            return Err(TypedDataError::InvalidValue {
                field: format!("types.{EIP712_DOMAIN_TYPE}"),
                reason: "expected name, version, chainId, verifyingContract".to_string(),
            });
        }

        let primary_type = value["primaryType"]
            .as_str()
            .ok_or_else(|| TypedDataError::MissingField("primaryType".to_string()))?;

        let definition = value["types"]
            .get(primary_type)
            .ok_or_else(|| TypedDataError::MissingField(format!("types.{primary_type}")))?;
        let properties: Vec<TypeProperty> = serde_json::from_value(definition.clone())
            .map_err(|e| TypedDataError::InvalidValue {
                field: format!("types.{primary_type}"),
                reason: e.to_string(),
            })?;

        let message = value["message"]
            .as_object()
            .ok_or_else(|| TypedDataError::MissingField("message".to_string()))?;

        let fields = properties
            .into_iter()
            .map(|property| {
                let raw = message
                    .get(&property.name)
                    .ok_or_else(|| TypedDataError::MissingField(property.name.clone()))?;
                let value = FieldValue::from_json(&property.name, &property.type_name, raw)?;
                Ok(TypedField::new(property.name, property.type_name, value))
            })
            .collect::<Result<Vec<_>, TypedDataError>>()?;

        Ok(Self {
            domain,
            primary_type: primary_type.to_string(),
            fields,
        })
    }
}

impl Serialize for ForwardRequestTypedData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ForwardRequestTypedData", 4)?;
        state.serialize_field("domain", &self.domain)?;
        state.serialize_field("types", &self.types())?;
        state.serialize_field("primaryType", &self.primary_type)?;
        state.serialize_field("message", &self.message())?;
        state.end()
    }
}
