//! # Domain Module
//!
//! Forward request logic: typed data construction and the submission state machine.

pub mod forward_request;
pub use forward_request::*;
