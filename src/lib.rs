//! # Gasless relay client
//!
//! Builds EIP-712 forward requests, signs them locally and hands them to a gas relay,
//! which executes the call through a trusted forwarder and pays for gas.
//!
//! ## Module layout
//!
//! * `config` - environment-driven configuration, validated once
//! * `constants` - typed-data layout and defaults
//! * `domain` - typed data builder and the submission state machine
//! * `logging` - `simplelog` setup
//! * `models` - typed data, envelope, JSON-RPC and error types
//! * `services` - chain RPC, signer and relay clients
//! * `utils` - serde helpers and polling

pub mod config;
pub mod constants;
pub mod domain;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;
