use std::{env, fmt, str::FromStr, time::Duration};

use alloy::primitives::{keccak256, Address, Bytes};
use validator::{Validate, ValidationError};
use zeroize::Zeroizing;

use super::ConfigError;
use crate::{
    constants::{
        DEFAULT_CONFIRMATION_POLL_INTERVAL_MS, DEFAULT_CONFIRMATION_TIMEOUT_MS,
        DEFAULT_RELAY_TIMEOUT_MS, DEFAULT_RPC_TIMEOUT_MS, DEFAULT_TARGET_FUNCTION,
    },
    models::RequestTypeConfig,
};

/// Raw configuration values as read from the environment.
///
/// Empty strings stand for unset variables and are rejected by validation.
#[derive(Clone, Validate)]
pub struct RelayClientEnvConfig {
    #[validate(url(message = "PUBLIC_SUBNET_RPC_URL must be a valid URL"))]
    pub rpc_url: String,
    #[validate(url(message = "GAS_RELAYER_RPC_URL must be a valid URL"))]
    pub relay_url: String,
    #[validate(length(min = 1, message = "FORWARDER_ADDRESS cannot be empty"))]
    pub forwarder_address: String,
    #[validate(length(min = 1, message = "COUNTER_CONTRACT_ADDRESS cannot be empty"))]
    pub target_address: String,
    #[validate(length(min = 1, message = "TARGET_FUNCTION cannot be empty"))]
    pub target_function: String,
    #[validate(length(min = 1, message = "DOMAIN_NAME cannot be empty"))]
    pub domain_name: String,
    #[validate(length(min = 1, message = "DOMAIN_VERSION cannot be empty"))]
    pub domain_version: String,
    #[validate(length(min = 1, message = "REQUEST_TYPE cannot be empty"))]
    pub request_type: String,
    #[validate(length(min = 1, message = "SUFFIX_TYPE cannot be empty"))]
    pub suffix_type: String,
    #[validate(length(min = 1, message = "SUFFIX_NAME cannot be empty"))]
    pub suffix_name: String,
    #[validate(custom(
        function = "validate_private_key",
        message = "PRIVATE_KEY cannot be empty"
    ))]
    pub private_key: Zeroizing<String>,
    pub rpc_timeout_ms: u64,
    pub relay_timeout_ms: u64,
    pub confirmation_timeout_ms: u64,
    pub confirmation_poll_interval_ms: u64,
}

impl RelayClientEnvConfig {
    pub fn from_env() -> Self {
        Self {
            rpc_url: env_string("PUBLIC_SUBNET_RPC_URL"),
            relay_url: env_string("GAS_RELAYER_RPC_URL"),
            forwarder_address: env_string("FORWARDER_ADDRESS"),
            target_address: env_string("COUNTER_CONTRACT_ADDRESS"),
            target_function: env::var("TARGET_FUNCTION")
                .unwrap_or_else(|_| DEFAULT_TARGET_FUNCTION.to_string()),
            domain_name: env_string("DOMAIN_NAME"),
            domain_version: env_string("DOMAIN_VERSION"),
            request_type: env_string("REQUEST_TYPE"),
            suffix_type: env_string("SUFFIX_TYPE"),
            suffix_name: env_string("SUFFIX_NAME"),
            private_key: Zeroizing::new(env_string("PRIVATE_KEY")),
            rpc_timeout_ms: env_parse("RPC_TIMEOUT_MS", DEFAULT_RPC_TIMEOUT_MS),
            relay_timeout_ms: env_parse("RELAY_TIMEOUT_MS", DEFAULT_RELAY_TIMEOUT_MS),
            confirmation_timeout_ms: env_parse(
                "CONFIRMATION_TIMEOUT_MS",
                DEFAULT_CONFIRMATION_TIMEOUT_MS,
            ),
            confirmation_poll_interval_ms: env_parse(
                "CONFIRMATION_POLL_INTERVAL_MS",
                DEFAULT_CONFIRMATION_POLL_INTERVAL_MS,
            ),
        }
    }
}

/// Validated configuration for a single forward request submission.
#[derive(Clone)]
pub struct RelayClientConfig {
    pub rpc_url: String,
    pub relay_url: String,
    pub forwarder_address: Address,
    pub target_address: Address,
    /// Zero-argument function signature on the target, e.g. `increment()`.
    pub target_function: String,
    pub domain_name: String,
    pub domain_version: String,
    pub request_type: RequestTypeConfig,
    pub private_key: Zeroizing<String>,
    pub rpc_timeout_ms: u64,
    pub relay_timeout_ms: u64,
    pub confirmation_timeout_ms: u64,
    pub confirmation_poll_interval_ms: u64,
}

impl RelayClientConfig {
    /// Loads and validates the configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        RelayClientEnvConfig::from_env().try_into()
    }

    /// Four-byte selector of the configured target function.
    pub fn target_selector(&self) -> Bytes {
        function_selector(&self.target_function)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_millis(self.confirmation_timeout_ms)
    }

    pub fn confirmation_poll_interval(&self) -> Duration {
        Duration::from_millis(self.confirmation_poll_interval_ms)
    }
}

impl TryFrom<RelayClientEnvConfig> for RelayClientConfig {
    type Error = ConfigError;

    fn try_from(raw: RelayClientEnvConfig) -> Result<Self, Self::Error> {
        raw.validate()?;

        let forwarder_address = parse_address("FORWARDER_ADDRESS", &raw.forwarder_address)?;
        let target_address = parse_address("COUNTER_CONTRACT_ADDRESS", &raw.target_address)?;
        validate_target_function(&raw.target_function)?;

        if raw.confirmation_poll_interval_ms == 0 {
            return Err(ConfigError::invalid(
                "CONFIRMATION_POLL_INTERVAL_MS",
                "must be greater than zero",
            ));
        }

        Ok(Self {
            rpc_url: raw.rpc_url,
            relay_url: raw.relay_url,
            forwarder_address,
            target_address,
            target_function: raw.target_function,
            domain_name: raw.domain_name,
            domain_version: raw.domain_version,
            request_type: RequestTypeConfig {
                primary_type: raw.request_type,
                suffix_type: raw.suffix_type,
                suffix_name: raw.suffix_name,
            },
            private_key: raw.private_key,
            rpc_timeout_ms: raw.rpc_timeout_ms,
            relay_timeout_ms: raw.relay_timeout_ms,
            confirmation_timeout_ms: raw.confirmation_timeout_ms,
            confirmation_poll_interval_ms: raw.confirmation_poll_interval_ms,
        })
    }
}

impl fmt::Debug for RelayClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayClientConfig")
            .field("rpc_url", &self.rpc_url)
            .field("relay_url", &self.relay_url)
            .field("forwarder_address", &self.forwarder_address)
            .field("target_address", &self.target_address)
            .field("target_function", &self.target_function)
            .field("domain_name", &self.domain_name)
            .field("domain_version", &self.domain_version)
            .field("request_type", &self.request_type)
            .field("private_key", &"[REDACTED]")
            .field("rpc_timeout_ms", &self.rpc_timeout_ms)
            .field("relay_timeout_ms", &self.relay_timeout_ms)
            .field("confirmation_timeout_ms", &self.confirmation_timeout_ms)
            .field(
                "confirmation_poll_interval_ms",
                &self.confirmation_poll_interval_ms,
            )
            .finish()
    }
}

/// Computes the ABI selector (`keccak256(signature)[..4]`) of a function signature.
pub fn function_selector(signature: &str) -> Bytes {
    let hash = keccak256(signature.as_bytes());
    Bytes::copy_from_slice(&hash[..4])
}

fn parse_address(field: &str, value: &str) -> Result<Address, ConfigError> {
    Address::from_str(value.trim()).map_err(|e| ConfigError::invalid(field, e.to_string()))
}

// Only zero-argument functions can be forwarded: the selector is the whole call payload.
fn validate_target_function(signature: &str) -> Result<(), ConfigError> {
    let name = signature.strip_suffix("()").ok_or_else(|| {
        ConfigError::invalid(
            "TARGET_FUNCTION",
            format!("'{signature}' is not a zero-argument function signature"),
        )
    })?;

    let valid_identifier = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid_identifier {
        return Err(ConfigError::invalid(
            "TARGET_FUNCTION",
            format!("'{name}' is not a valid function name"),
        ));
    }
    Ok(())
}

fn validate_private_key(private_key: &Zeroizing<String>) -> Result<(), ValidationError> {
    if private_key.trim().is_empty() {
        return Err(ValidationError::new("private_key_empty"));
    }
    Ok(())
}

fn env_string(name: &str) -> String {
    env::var(name).unwrap_or_default()
}

fn env_parse<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
