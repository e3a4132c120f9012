mod evm;
pub use evm::*;

mod json_rpc;
pub use json_rpc::*;
