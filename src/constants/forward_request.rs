//! Constants describing the forward request typed-data layout.
//!
//! The names, types and order below are part of the signed commitment: the forwarder
//! contract re-derives the same type string, so none of them may change for a given
//! forwarder deployment.

/// Name of the EIP-712 domain type.
pub const EIP712_DOMAIN_TYPE: &str = "EIP712Domain";

/// `EIP712Domain` fields as `(name, type)`, in signing order.
pub const EIP712_DOMAIN_FIELDS: [(&str, &str); 4] = [
    ("name", "string"),
    ("version", "string"),
    ("chainId", "uint256"),
    ("verifyingContract", "address"),
];

/// Fixed forward request fields as `(name, type)`. The configurable suffix field is
/// appended after these.
pub const FORWARD_REQUEST_FIELDS: [(&str, &str); 7] = [
    ("from", "address"),
    ("to", "address"),
    ("value", "uint256"),
    ("gas", "uint256"),
    ("nonce", "uint256"),
    ("data", "bytes"),
    ("validUntilTime", "uint256"),
];

/// Native value forwarded with the call. Forward requests never carry value.
pub const FORWARD_REQUEST_VALUE: &str = "0x0";

/// `type(uint256).max`, used as a "never expires" marker for `validUntilTime`.
pub const VALID_UNTIL_TIME_UNBOUNDED: &str =
    "0xffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";

/// Target function invoked through the forwarder when none is configured.
pub const DEFAULT_TARGET_FUNCTION: &str = "increment()";

/// Largest fixed-size byte type allowed by the ABI (`bytes32`).
pub const MAX_FIXED_BYTES_LENGTH: usize = 32;
