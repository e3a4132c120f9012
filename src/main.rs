//! Submits a single gasless call to the configured target contract.
//!
//! Configuration is read from the environment (and an optional `.env` file); see
//! `RelayClientConfig` for the variables. The process exits non-zero when the forward
//! request does not reach `Confirmed`.

use std::time::Duration;

use color_eyre::{eyre::WrapErr, Result};
use dotenvy::dotenv;
use log::{error, info};

use gasless_relay_client::{
    config::RelayClientConfig,
    domain::{ForwardRequestRelayer, SubmissionSettings},
    logging::setup_logging,
    models::ForwardRequestError,
    services::{provider::EvmProvider, relay::RelayClient, signer::LocalSigner},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    color_eyre::install()?;
    setup_logging()?;

    let config = RelayClientConfig::from_env().wrap_err("Invalid configuration")?;
    info!("Loaded configuration: {config:?}");

    let chain = EvmProvider::new(
        &config.rpc_url,
        Duration::from_millis(config.rpc_timeout_ms),
    )?;
    let signer = LocalSigner::from_private_key(&config.private_key)?;
    let relay = RelayClient::new(
        &config.relay_url,
        Duration::from_millis(config.relay_timeout_ms),
    )?;

    let relayer =
        ForwardRequestRelayer::new(chain, signer, relay, SubmissionSettings::from(&config));

    match relayer.submit().await {
        Ok(confirmed) => {
            info!(
                "Forward request {} confirmed in block {:?} (gas used {})",
                confirmed.tx_hash, confirmed.mined.block_number, confirmed.mined.gas_used
            );
            Ok(())
        }
        Err(failure) => {
            match &failure.error {
                ForwardRequestError::RelayRejected { body, .. } => {
                    error!("error occurred while sending transaction: {body}")
                }
                other => error!("Forward request failed after {}: {other}", failure.stage),
            }
            Err(failure.into())
        }
    }
}
