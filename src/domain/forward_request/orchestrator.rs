//! Sequencing of a forward request submission.
//!
//! `Init → NonceFetched → GasEstimated → StructureBuilt → Signed → SelfVerified →
//! Submitted → Confirmed`. Each step consumes the previous step's output; the first
//! failure ends the run in `Failed` and nothing is retried.

use std::time::Duration;

use alloy::primitives::{Address, Bytes};
use log::{debug, info, warn};

use super::{
    build_forward_request, ConfirmedSubmission, ForwardRequestParams, SubmissionFailure,
    SubmissionProgress,
};
use crate::{
    config::RelayClientConfig,
    models::{ForwardRequestEnvelope, ForwardRequestError, RequestTypeConfig},
    services::{provider::ChainClient, relay::RelaySubmitter, signer::ForwardRequestSigner},
};

/// Per-run values the relayer needs besides its collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionSettings {
    pub domain_name: String,
    pub domain_version: String,
    pub forwarder: Address,
    pub target: Address,
    pub target_function: String,
    pub target_selector: Bytes,
    pub request_type: RequestTypeConfig,
    pub confirmation_timeout: Duration,
    pub confirmation_poll_interval: Duration,
}

impl From<&RelayClientConfig> for SubmissionSettings {
    fn from(config: &RelayClientConfig) -> Self {
        Self {
            domain_name: config.domain_name.clone(),
            domain_version: config.domain_version.clone(),
            forwarder: config.forwarder_address,
            target: config.target_address,
            target_function: config.target_function.clone(),
            target_selector: config.target_selector(),
            request_type: config.request_type.clone(),
            confirmation_timeout: config.confirmation_timeout(),
            confirmation_poll_interval: config.confirmation_poll_interval(),
        }
    }
}

/// Builds, signs, relays and confirms one forward request.
pub struct ForwardRequestRelayer<C, S, R>
where
    C: ChainClient,
    S: ForwardRequestSigner,
    R: RelaySubmitter,
{
    chain: C,
    signer: S,
    relay: R,
    settings: SubmissionSettings,
}

impl<C, S, R> ForwardRequestRelayer<C, S, R>
where
    C: ChainClient,
    S: ForwardRequestSigner,
    R: RelaySubmitter,
{
    pub fn new(chain: C, signer: S, relay: R, settings: SubmissionSettings) -> Self {
        Self {
            chain,
            signer,
            relay,
            settings,
        }
    }

    /// Runs the submission to `Confirmed`, or returns the failure and the stage it
    /// happened after.
    pub async fn submit(&self) -> Result<ConfirmedSubmission, SubmissionFailure> {
        let settings = &self.settings;
        let mut progress = SubmissionProgress::new();
        let from = self.signer.address();

        let chain_id = self
            .chain
            .get_chain_id()
            .await
            .map_err(|e| progress.fail(e))?;
        let nonce = self
            .chain
            .get_nonce(settings.forwarder, from)
            .await
            .map_err(|e| progress.fail(e))?;
        info!("Forwarder nonce for {from}: {nonce}");
        progress.advance();

        let gas = self
            .chain
            .estimate_gas(from, settings.target, settings.target_selector.clone())
            .await
            .map_err(|e| progress.fail(e))?;
        info!(
            "estimated gas usage for {}: {}",
            settings.target_function, gas
        );
        progress.advance();

        let typed_data = build_forward_request(&ForwardRequestParams {
            domain_name: settings.domain_name.clone(),
            domain_version: settings.domain_version.clone(),
            chain_id,
            forwarder: settings.forwarder,
            call_data: settings.target_selector.clone(),
            from,
            to: settings.target,
            gas,
            nonce,
            request_type: settings.request_type.clone(),
        })
        .map_err(|e| progress.fail(e))?;
        progress.advance();

        let signature = self
            .signer
            .sign_typed_data(&typed_data)
            .await
            .map_err(|e| progress.fail(e))?;
        progress.advance();

        let recovered = self
            .signer
            .recover_address(&typed_data, &signature)
            .map_err(|e| progress.fail(ForwardRequestError::SignatureIntegrity(e.to_string())))?;
        if recovered != from {
            return Err(progress.fail(ForwardRequestError::SignatureIntegrity(format!(
                "recovered {recovered}, expected {from}"
            ))));
        }
        progress.advance();

        let envelope = ForwardRequestEnvelope::new(typed_data, &signature);
        let tx_hash = self
            .relay
            .submit(&envelope)
            .await
            .map_err(|e| progress.fail(e))?;
        info!("txHash : {tx_hash}");
        progress.advance();

        let mined = self
            .chain
            .wait_for_transaction(
                tx_hash,
                settings.confirmation_timeout,
                settings.confirmation_poll_interval,
            )
            .await
            .map_err(|e| progress.fail(e))?
            .ok_or_else(|| {
                progress.fail(ForwardRequestError::TransactionTimeout {
                    tx_hash,
                    waited_ms: settings.confirmation_timeout.as_millis() as u64,
                })
            })?;

        if !mined.status {
            warn!("Transaction {tx_hash} was mined but reverted");
        }
        info!(
            "tx mined : {}",
            serde_json::to_string_pretty(&mined.receipt).unwrap_or_default()
        );
        progress.advance();
        debug!("Forward request {tx_hash} reached {}", progress.stage());

        Ok(ConfirmedSubmission {
            from,
            chain_id,
            nonce,
            gas,
            signature,
            tx_hash,
            mined,
        })
    }
}
