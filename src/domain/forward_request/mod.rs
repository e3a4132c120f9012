mod builder;
pub use builder::*;

mod orchestrator;
pub use orchestrator::*;

mod state;
pub use state::*;
