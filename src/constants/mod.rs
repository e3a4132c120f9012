mod forward_request;
pub use forward_request::*;

mod logging;
pub use logging::*;

mod relay;
pub use relay::*;
