//! # Services Module
//!
//! Clients for the external systems a forward request touches: the chain RPC node,
//! the signing key and the gas relay.

pub mod provider;
pub mod relay;
pub mod signer;
