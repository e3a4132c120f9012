mod error;
pub use error::*;

mod forward_request;
pub use forward_request::*;

mod rpc;
pub use rpc::*;
