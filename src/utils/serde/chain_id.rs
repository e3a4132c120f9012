//! Deserialization of EIP-712 `chainId` values.
//!
//! Signing libraries disagree on how `chainId` is written in typed-data JSON: as a
//! number, a decimal string or a `0x` hex quantity. All three are accepted here.
use std::fmt;

use serde::{de, Deserializer};

#[derive(Debug)]
struct ChainIdVisitor;

impl de::Visitor<'_> for ChainIdVisitor {
    type Value = u64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a chain id as an integer, a decimal string or a hex quantity")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        match value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
        {
            Some(hex) => u64::from_str_radix(hex, 16).map_err(de::Error::custom),
            None => value.parse::<u64>().map_err(de::Error::custom),
        }
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(value)
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        u64::try_from(value).map_err(|_| de::Error::custom("chain id cannot be negative"))
    }
}

pub fn deserialize_chain_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(ChainIdVisitor)
}
