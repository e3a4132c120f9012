mod forward_request;
pub use forward_request::*;

mod relay;
pub use relay::*;

mod signer;
pub use signer::*;

mod typed_data;
pub use typed_data::*;
