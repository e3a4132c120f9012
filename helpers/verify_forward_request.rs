//! # Forward Request Verification Tool
//!
//! Decodes an `eth_sendRawTransaction` parameter produced by the relay client, recomputes
//! its EIP-712 digest and checks that the embedded signature was made by the request's
//! `from` address.
//!
//! ## Usage
//!
//! ```bash
//! # Verify a raw relay parameter (as captured from the relay request body)
//! cargo run --example verify_forward_request -- --raw-tx 0x7b22666f72776172645265717565737422...
//!
//! # Also require a specific signer
//! cargo run --example verify_forward_request -- \
//!   --raw-tx 0x7b22... \
//!   --expected-address 0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf
//!
//! # Read the parameter or a full JSON-RPC request body from a file
//! cargo run --example verify_forward_request -- --file request.json
//! ```

use alloy::primitives::Address;
use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use std::{fs, str::FromStr};

use gasless_relay_client::{
    models::{ForwardRequestEnvelope, ForwardRequestSignature, JsonRpcRequest},
    services::signer::{
        encode_primary_type, recover_typed_data_signer, to_dyn_typed_data, typed_data_digest,
    },
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Raw transaction parameter: `0x` followed by the hex of the envelope JSON.
    #[arg(long, conflicts_with = "file")]
    raw_tx: Option<String>,

    /// File holding either the raw parameter or the whole JSON-RPC request body.
    #[arg(long)]
    file: Option<String>,

    /// Expected signer address (checked in addition to the request's `from`).
    #[arg(long)]
    expected_address: Option<String>,
}

fn read_raw_transaction(args: &Args) -> Result<String> {
    if let Some(raw_tx) = &args.raw_tx {
        return Ok(raw_tx.trim().to_string());
    }

    let path = args
        .file
        .as_ref()
        .ok_or_else(|| eyre!("Either --raw-tx or --file must be provided"))?;
    let contents =
        fs::read_to_string(path).wrap_err_with(|| format!("Failed to read {path}"))?;
    let contents = contents.trim();

    if contents.starts_with('{') {
        let request: JsonRpcRequest<Vec<String>> =
            serde_json::from_str(contents).wrap_err("Failed to parse JSON-RPC request body")?;
        return request
            .params
            .into_iter()
            .next()
            .ok_or_else(|| eyre!("JSON-RPC request has no params"));
    }

    Ok(contents.to_string())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    println!("Forward Request Verification Tool\n");

    let raw_tx = read_raw_transaction(&args)?;
    let envelope = ForwardRequestEnvelope::from_raw_transaction(&raw_tx)
        .wrap_err("Failed to decode forward request envelope")?;
    let typed_data = &envelope.forward_request;

    let dyn_typed_data = to_dyn_typed_data(typed_data)?;
    let domain_separator = dyn_typed_data.domain.separator();
    let hash_struct = dyn_typed_data
        .hash_struct()
        .wrap_err("Failed to hash forward request message")?;
    let digest = typed_data_digest(typed_data)?;

    println!("Typed Data:");
    println!("  Domain:           {}", serde_json::to_string(&typed_data.domain)?);
    println!("  Primary Type:     {}", typed_data.primary_type);
    println!("  Encoded Type:     {}", encode_primary_type(typed_data)?);
    println!("  Domain Separator: {domain_separator}");
    println!("  Hash Struct:      {hash_struct}");
    println!("  Message Hash:     {digest}\n");

    let signature = ForwardRequestSignature::from_hex(&envelope.metadata.signature)?;
    println!("Signature Components:");
    println!("  r: 0x{}", signature.r);
    println!("  s: 0x{}", signature.s);
    println!("  v: {}\n", signature.v);

    let recovered_address = recover_typed_data_signer(typed_data, &signature)?;
    let from = typed_data
        .field("from")
        .and_then(|value| value.as_address())
        .ok_or_else(|| eyre!("Forward request has no address 'from' field"))?;

    println!("Verification Result:");
    println!("  Recovered Address: {recovered_address}");
    println!("  Request From:      {from}");

    if recovered_address != from {
        println!("\nFAILURE: The signature was not made by the request's 'from' address.");
        return Err(eyre!("Signature verification failed"));
    }

    if let Some(expected_str) = args.expected_address {
        let expected_address =
            Address::from_str(&expected_str).wrap_err("Failed to parse expected address")?;
        println!("  Expected Address:  {expected_address}");

        if recovered_address != expected_address {
            println!("\nFAILURE: The request was signed by a different account.");
            return Err(eyre!("Signature verification failed"));
        }
    }

    println!("\nSUCCESS: Signature is valid for this forward request.");
    Ok(())
}
