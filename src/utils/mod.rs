mod serde;
pub use serde::*;

mod polling;
pub use polling::*;
