use thiserror::Error;

/// Errors raised while reading a forward request back from its JSON form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypedDataError {
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Unsupported type '{type_name}' for field {field}")]
    UnsupportedType { field: String, type_name: String },
}
