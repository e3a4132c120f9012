/// JSON-RPC method the relay server accepts forward requests on.
pub const RELAY_SEND_METHOD: &str = "eth_sendRawTransaction";

pub const JSON_RPC_VERSION: &str = "2.0";

/// Request id used for every relay submission (one request per run).
pub const RELAY_REQUEST_ID: u64 = 1;

/// Default timeout for chain RPC requests, in milliseconds.
pub const DEFAULT_RPC_TIMEOUT_MS: u64 = 30_000;

/// Default timeout for the relay POST, in milliseconds.
pub const DEFAULT_RELAY_TIMEOUT_MS: u64 = 30_000;

/// Default upper bound on waiting for the relayed transaction to be mined (5 minutes).
pub const DEFAULT_CONFIRMATION_TIMEOUT_MS: u64 = 300_000;

/// Default interval between receipt polls, in milliseconds.
pub const DEFAULT_CONFIRMATION_POLL_INTERVAL_MS: u64 = 2_000;
