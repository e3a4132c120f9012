mod domain;
pub use domain::*;

mod envelope;
pub use envelope::*;

mod request_type;
pub use request_type::*;

mod signature;
pub use signature::*;

mod typed_data;
pub use typed_data::*;
