//! Submission of signed forward requests to a gas relay over JSON-RPC.

use std::{str::FromStr, time::Duration};

use alloy::primitives::TxHash;
use async_trait::async_trait;
use log::{debug, error};
use reqwest::header::CONTENT_TYPE;

use crate::{
    constants::{RELAY_REQUEST_ID, RELAY_SEND_METHOD},
    models::{ForwardRequestEnvelope, JsonRpcRequest, JsonRpcResponse, RelayError},
};

#[cfg(test)]
use mockall::automock;


#[async_trait]
#[cfg_attr(test, automock)]
pub trait RelaySubmitter: Send + Sync {
    /// Sends a signed forward request and returns the hash of the relayed transaction.
    async fn submit(&self, envelope: &ForwardRequestEnvelope) -> Result<TxHash, RelayError>;
}

/// Wraps an envelope as a single-parameter `eth_sendRawTransaction` request.
pub fn build_relay_request(
    envelope: &ForwardRequestEnvelope,
) -> Result<JsonRpcRequest<Vec<String>>, RelayError> {
    let raw_transaction = envelope.to_raw_transaction()?;
    Ok(JsonRpcRequest::new(
        RELAY_REQUEST_ID,
        RELAY_SEND_METHOD,
        vec![raw_transaction],
    ))
}

/// HTTP client for a gas relay JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: reqwest::Client,
    url: String,
}

impl RelayClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, RelayError> {
        reqwest::Url::parse(url)
            .map_err(|e| RelayError::Configuration(format!("Invalid relay URL: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl RelaySubmitter for RelayClient {
    async fn submit(&self, envelope: &ForwardRequestEnvelope) -> Result<TxHash, RelayError> {
        let request = build_relay_request(envelope)?;
        debug!("Sending {} to {}", request.method, self.url);

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("Relay returned HTTP {}: {}", status.as_u16(), body);
            return Err(RelayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let rpc_response: JsonRpcResponse = serde_json::from_str(&body)
            .map_err(|e| RelayError::InvalidResponse(format!("{e}: {body}")))?;

        if rpc_response.error.is_some() {
            error!("Relay returned JSON-RPC error: {}", body);
            return Err(RelayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let result = rpc_response
            .result
            .ok_or_else(|| RelayError::InvalidResponse(format!("missing result: {body}")))?;
        let tx_hash = result
            .as_str()
            .ok_or_else(|| RelayError::InvalidResponse(format!("result is not a string: {result}")))?;

        TxHash::from_str(tx_hash)
            .map_err(|e| RelayError::InvalidResponse(format!("invalid transaction hash {tx_hash}: {e}")))
    }
}
