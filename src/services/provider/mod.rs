use thiserror::Error;

use alloy::transports::{RpcError, TransportErrorKind};

pub mod evm;
pub use evm::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Network configuration error: {0}")]
    NetworkConfiguration(String),
    #[error("Request timeout")]
    Timeout,
    #[error("Rate limited (HTTP 429)")]
    RateLimited,
    #[error("Bad gateway (HTTP 502)")]
    BadGateway,
    #[error("Request error (HTTP {status_code}): {error}")]
    RequestError { error: String, status_code: u16 },
    #[error("JSON-RPC error (code {code}): {message}")]
    RpcErrorCode { code: i64, message: String },
    #[error("Transport error: {0}")]
    TransportError(String),
    #[error("Invalid contract response: {0}")]
    InvalidResponse(String),
    #[error("Other provider error: {0}")]
    Other(String),
}

/// Maps a reqwest error onto the matching `ProviderError` variant.
///
/// - Timeout errors become `ProviderError::Timeout`
/// - Errors carrying an HTTP status go through `categorize_http_status`
/// - Everything else becomes `ProviderError::TransportError`
fn categorize_reqwest_error(err: &reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        return ProviderError::Timeout;
    }

    if let Some(status) = err.status() {
        return categorize_http_status(status.as_u16(), err.to_string());
    }

    ProviderError::TransportError(err.to_string())
}

/// - HTTP 429 responses become `ProviderError::RateLimited`
/// - HTTP 502 responses become `ProviderError::BadGateway`
/// - Other statuses become `ProviderError::RequestError`
fn categorize_http_status(status_code: u16, error: String) -> ProviderError {
    match status_code {
        429 => ProviderError::RateLimited,
        502 => ProviderError::BadGateway,
        status_code => ProviderError::RequestError { error, status_code },
    }
}

/// Maps the HTTP transport's failures. Non-success statuses arrive as
/// `HttpError`; reqwest failures (including timeouts) arrive boxed in `Custom`.
fn categorize_transport_error(kind: TransportErrorKind) -> ProviderError {
    match kind {
        TransportErrorKind::HttpError(http_error) => {
            categorize_http_status(http_error.status, http_error.body)
        }
        TransportErrorKind::Custom(err) => match err.downcast_ref::<reqwest::Error>() {
            Some(reqwest_err) => categorize_reqwest_error(reqwest_err),
            None => ProviderError::TransportError(err.to_string()),
        },
        other => ProviderError::TransportError(other.to_string()),
    }
}

impl From<RpcError<TransportErrorKind>> for ProviderError {
    fn from(err: RpcError<TransportErrorKind>) -> Self {
        match err {
            RpcError::Transport(kind) => categorize_transport_error(kind),
            RpcError::ErrorResp(json_rpc_err) => ProviderError::RpcErrorCode {
                code: json_rpc_err.code,
                message: json_rpc_err.message.to_string(),
            },
            _ => ProviderError::Other(format!("Other RPC error: {err}")),
        }
    }
}
