//! Chain access for forward requests.
//!
//! Wraps an HTTP JSON-RPC provider and exposes the handful of reads the submission
//! pipeline needs: chain id, forwarder nonce, gas estimation and receipt lookups.

use std::time::Duration;

use alloy::{
    network::AnyNetwork,
    primitives::{Address, Bytes, TxHash, TxKind, U256},
    providers::{Provider, RootProvider},
    rpc::{
        client::ClientBuilder,
        types::{TransactionInput, TransactionRequest},
    },
    sol,
    sol_types::SolCall,
    transports::http::Http,
};
use async_trait::async_trait;
use log::debug;
use reqwest::ClientBuilder as ReqwestClientBuilder;

use crate::{models::MinedTransaction, utils::poll_until};

#[cfg(test)]
use mockall::automock;

use super::ProviderError;

sol! {
    interface IForwarder {
        function getNonce(address from) external view returns (uint256);
    }
}

/// Read access to the chain a forward request targets.
///
/// Every call is a single round trip. Nothing is retried here; callers own retry policy.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait ChainClient: Send + Sync {
    /// Chain id used in the EIP-712 domain.
    async fn get_chain_id(&self) -> Result<u64, ProviderError>;

    /// Current nonce of `from` as tracked by the forwarder contract.
    async fn get_nonce(&self, forwarder: Address, from: Address) -> Result<U256, ProviderError>;

    /// Gas needed for `from` to call `target` with `call_data`.
    async fn estimate_gas(
        &self,
        from: Address,
        target: Address,
        call_data: Bytes,
    ) -> Result<u64, ProviderError>;

    /// Receipt of a mined transaction, or `None` while it is pending or unknown.
    async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> Result<Option<MinedTransaction>, ProviderError>;

    /// Polls for the receipt of `tx_hash` until it is mined or `timeout` elapses.
    ///
    /// Returns `Ok(None)` on timeout. A failed receipt lookup ends the wait with that error.
    async fn wait_for_transaction(
        &self,
        tx_hash: TxHash,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<Option<MinedTransaction>, ProviderError> {
        poll_until(
            || self.get_transaction_receipt(tx_hash),
            timeout,
            poll_interval,
            &format!("receipt of {tx_hash}"),
        )
        .await
    }
}

/// `ChainClient` over an alloy HTTP provider.
#[derive(Clone)]
pub struct EvmProvider {
    provider: RootProvider<AnyNetwork>,
}

impl EvmProvider {
    /// Creates a provider for `url` whose HTTP requests time out after `timeout`.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let rpc_url: reqwest::Url = url
            .parse()
            .map_err(|e| ProviderError::NetworkConfiguration(format!("Invalid URL format: {e}")))?;

        let client = ReqwestClientBuilder::new()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Other(format!("Failed to build HTTP client: {e}")))?;

        let transport = Http::with_client(client, rpc_url);
        let is_local = transport.guess_local();
        let client = ClientBuilder::default().transport(transport, is_local);

        Ok(Self {
            provider: RootProvider::new(client),
        })
    }
}

#[async_trait]
impl ChainClient for EvmProvider {
    async fn get_chain_id(&self) -> Result<u64, ProviderError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(ProviderError::from)
    }

    async fn get_nonce(&self, forwarder: Address, from: Address) -> Result<U256, ProviderError> {
        let call = IForwarder::getNonceCall { from };
        let tx = call_request(None, forwarder, call.abi_encode().into());

        let output = self
            .provider
            .call(tx.into())
            .await
            .map_err(ProviderError::from)?;
        debug!("getNonce({from}) on {forwarder} returned {output}");

        IForwarder::getNonceCall::abi_decode_returns(&output)
            .map_err(|e| ProviderError::InvalidResponse(format!("getNonce: {e}")))
    }

    async fn estimate_gas(
        &self,
        from: Address,
        target: Address,
        call_data: Bytes,
    ) -> Result<u64, ProviderError> {
        let tx = call_request(Some(from), target, call_data);

        self.provider
            .estimate_gas(tx.into())
            .await
            .map_err(ProviderError::from)
    }

    async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> Result<Option<MinedTransaction>, ProviderError> {
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(ProviderError::from)?;

        Ok(receipt.as_ref().map(MinedTransaction::from))
    }
}

fn call_request(from: Option<Address>, to: Address, input: Bytes) -> TransactionRequest {
    TransactionRequest {
        from,
        to: Some(TxKind::Call(to)),
        input: TransactionInput::new(input),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, b256};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use wiremock::{
        matchers::{body_partial_json, method},
        Mock, MockServer, Request, ResponseTemplate,
    };

    const FORWARDER: Address = address!("5fbdb2315678afecb367f032d93f642f64180aa3");
    const SIGNER: Address = address!("7e5f4552091a69125d5dfcb7b8c2659029395bdf");
    const TARGET: Address = address!("e7f1725e7734ce288f8367e1bb143e90bb3f0512");

    // Echoes the request id back, as a real node does.
    fn rpc_result(result: Value) -> impl Fn(&Request) -> ResponseTemplate {
        move |request: &Request| {
            let body: Value = serde_json::from_slice(&request.body).unwrap();
            ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": body["id"],
                "result": result,
            }))
        }
    }

    fn rpc_error(code: i64, message: &str) -> impl Fn(&Request) -> ResponseTemplate {
        let message = message.to_string();
        move |request: &Request| {
            let body: Value = serde_json::from_slice(&request.body).unwrap();
            ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": body["id"],
                "error": {"code": code, "message": message},
            }))
        }
    }

    async fn mount(server: &MockServer, rpc_method: &str, responder: impl wiremock::Respond + 'static) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": rpc_method})))
            .respond_with(responder)
            .mount(server)
            .await;
    }

    fn provider(server: &MockServer) -> EvmProvider {
        EvmProvider::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_new_provider_rejects_invalid_url() {
        assert!(EvmProvider::new("http://localhost:8545", Duration::from_secs(30)).is_ok());

        let result = EvmProvider::new("invalid-url", Duration::from_secs(30));
        assert!(matches!(
            result,
            Err(ProviderError::NetworkConfiguration(_))
        ));
    }

    #[test]
    fn test_get_nonce_call_encoding() {
        let encoded = IForwarder::getNonceCall { from: SIGNER }.abi_encode();

        // getNonce(address) selector followed by the left-padded address.
        assert_eq!(hex::encode(&encoded[..4]), "2d0335ab");
        assert_eq!(&encoded[16..], SIGNER.as_slice());
    }

    #[tokio::test]
    async fn test_get_chain_id() {
        let server = MockServer::start().await;
        mount(&server, "eth_chainId", rpc_result(json!("0x7a69"))).await;

        let chain_id = provider(&server).get_chain_id().await.unwrap();

        assert_eq!(chain_id, 31337);
    }

    #[tokio::test]
    async fn test_get_nonce_decodes_uint256() {
        let server = MockServer::start().await;
        let five = format!("0x{:064x}", 5);
        mount(&server, "eth_call", rpc_result(json!(five))).await;

        let nonce = provider(&server).get_nonce(FORWARDER, SIGNER).await.unwrap();

        assert_eq!(nonce, U256::from(5));
    }

    #[tokio::test]
    async fn test_get_nonce_rejects_short_output() {
        let server = MockServer::start().await;
        mount(&server, "eth_call", rpc_result(json!("0x"))).await;

        let err = provider(&server)
            .get_nonce(FORWARDER, SIGNER)
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_estimate_gas() {
        let server = MockServer::start().await;
        mount(&server, "eth_estimateGas", rpc_result(json!("0x5208"))).await;

        let gas = provider(&server)
            .estimate_gas(SIGNER, TARGET, Bytes::from_static(&[0xd0, 0x9d, 0xe0, 0x8a]))
            .await
            .unwrap();

        assert_eq!(gas, 21000);
    }

    #[tokio::test]
    async fn test_estimate_gas_revert_is_reported() {
        let server = MockServer::start().await;
        mount(&server, "eth_estimateGas", rpc_error(3, "execution reverted")).await;

        let err = provider(&server)
            .estimate_gas(SIGNER, TARGET, Bytes::new())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ProviderError::RpcErrorCode {
                code: 3,
                message: "execution reverted".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_pending_receipt_is_none() {
        let server = MockServer::start().await;
        mount(&server, "eth_getTransactionReceipt", rpc_result(Value::Null)).await;

        let receipt = provider(&server)
            .get_transaction_receipt(TxHash::ZERO)
            .await
            .unwrap();

        assert!(receipt.is_none());
    }

    #[tokio::test]
    async fn test_wait_for_transaction_times_out() {
        let server = MockServer::start().await;
        mount(&server, "eth_getTransactionReceipt", rpc_result(Value::Null)).await;

        let receipt = provider(&server)
            .wait_for_transaction(
                TxHash::ZERO,
                Duration::from_millis(50),
                Duration::from_millis(10),
            )
            .await
            .unwrap();

        assert!(receipt.is_none());
    }

    #[tokio::test]
    async fn test_rate_limited_node_is_reported() {
        let server = MockServer::start().await;
        mount(&server, "eth_chainId", ResponseTemplate::new(429)).await;

        let err = provider(&server).get_chain_id().await.unwrap_err();

        assert_eq!(err, ProviderError::RateLimited);
    }

    #[tokio::test]
    async fn test_bad_gateway_is_reported() {
        let server = MockServer::start().await;
        mount(&server, "eth_estimateGas", ResponseTemplate::new(502)).await;

        let err = provider(&server)
            .estimate_gas(SIGNER, TARGET, Bytes::new())
            .await
            .unwrap_err();

        assert_eq!(err, ProviderError::BadGateway);
    }

    #[tokio::test]
    async fn test_other_http_status_keeps_code_and_body() {
        let server = MockServer::start().await;
        mount(
            &server,
            "eth_call",
            ResponseTemplate::new(503).set_body_string("maintenance"),
        )
        .await;

        let err = provider(&server)
            .get_nonce(FORWARDER, SIGNER)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ProviderError::RequestError {
                error: "maintenance".to_string(),
                status_code: 503,
            }
        );
    }

    #[tokio::test]
    async fn test_slow_node_times_out() {
        let server = MockServer::start().await;
        mount(
            &server,
            "eth_chainId",
            ResponseTemplate::new(200)
                .set_body_json(json!({"jsonrpc": "2.0", "id": 0, "result": "0x1"}))
                .set_delay(Duration::from_millis(500)),
        )
        .await;
        let provider = EvmProvider::new(&server.uri(), Duration::from_millis(50)).unwrap();

        let err = provider.get_chain_id().await.unwrap_err();

        assert_eq!(err, ProviderError::Timeout);
    }

    #[tokio::test]
    async fn test_unreachable_node_is_transport_error() {
        let provider =
            EvmProvider::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();

        let err = provider.get_chain_id().await.unwrap_err();

        assert!(matches!(err, ProviderError::TransportError(_)));
    }

    struct EventuallyMined {
        polls: Arc<AtomicU32>,
        mined_after: u32,
    }

    #[async_trait]
    impl ChainClient for EventuallyMined {
        async fn get_chain_id(&self) -> Result<u64, ProviderError> {
            unreachable!()
        }

        async fn get_nonce(&self, _: Address, _: Address) -> Result<U256, ProviderError> {
            unreachable!()
        }

        async fn estimate_gas(&self, _: Address, _: Address, _: Bytes) -> Result<u64, ProviderError> {
            unreachable!()
        }

        async fn get_transaction_receipt(
            &self,
            tx_hash: TxHash,
        ) -> Result<Option<MinedTransaction>, ProviderError> {
            let poll = self.polls.fetch_add(1, Ordering::SeqCst);
            Ok((poll >= self.mined_after).then(|| MinedTransaction {
                transaction_hash: tx_hash,
                block_number: Some(12),
                gas_used: 21000,
                status: true,
                receipt: json!({"transactionHash": tx_hash}),
            }))
        }
    }

    #[tokio::test]
    async fn test_wait_for_transaction_polls_until_mined() {
        let polls = Arc::new(AtomicU32::new(0));
        let client = EventuallyMined {
            polls: Arc::clone(&polls),
            mined_after: 2,
        };
        let tx_hash = b256!("1111111111111111111111111111111111111111111111111111111111111111");

        let mined = client
            .wait_for_transaction(tx_hash, Duration::from_secs(1), Duration::from_millis(5))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(mined.transaction_hash, tx_hash);
        assert_eq!(mined.block_number, Some(12));
        assert_eq!(polls.load(Ordering::SeqCst), 3);
    }
}
