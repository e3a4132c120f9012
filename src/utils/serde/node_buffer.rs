//! Serde support for byte values written as a Node.js `Buffer` JSON object.
//!
//! `JSON.stringify(Buffer.from("ab"))` produces `{"type":"Buffer","data":[97,98]}`.
//! Relays that decode envelopes produced by JavaScript clients expect raw byte fields
//! in that shape, so they are emitted and parsed the same way here.
use serde::{de, ser::SerializeStruct, Deserialize, Deserializer, Serializer};

pub const NODE_BUFFER_TYPE: &str = "Buffer";

pub fn serialize_node_buffer<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut state = serializer.serialize_struct("Buffer", 2)?;
    state.serialize_field("type", NODE_BUFFER_TYPE)?;
    state.serialize_field("data", bytes)?;
    state.end()
}

pub fn deserialize_node_buffer<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct NodeBuffer {
        #[serde(rename = "type")]
        kind: String,
        data: Vec<u8>,
    }

    let buffer = NodeBuffer::deserialize(deserializer)?;
    if buffer.kind != NODE_BUFFER_TYPE {
        return Err(de::Error::custom(format!(
            "expected a {NODE_BUFFER_TYPE} object, got type '{}'",
            buffer.kind
        )));
    }
    Ok(buffer.data)
}
