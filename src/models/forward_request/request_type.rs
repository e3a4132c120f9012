use serde::{Deserialize, Serialize};

/// Names of the application-defined typed-data entry.
///
/// `suffix_type` and `suffix_name` describe the trailing field appended after the fixed
/// forward request fields. Forwarder deployments pick their own suffix, so it is
/// configuration rather than a constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTypeConfig {
    pub primary_type: String,
    pub suffix_type: String,
    pub suffix_name: String,
}

impl RequestTypeConfig {
    /// Value signed for the suffix field: the UTF-8 bytes of `"<type> <name>)"`.
    ///
    /// This is the tail of the primary type's encoded type string, which is what the
    /// targeted forwarder expects to find in the field.
    pub fn suffix_value(&self) -> Vec<u8> {
        format!("{} {})", self.suffix_type, self.suffix_name).into_bytes()
    }
}
