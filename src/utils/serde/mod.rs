mod chain_id;
pub use chain_id::*;

mod checksum_address;
pub use checksum_address::*;

mod node_buffer;
pub use node_buffer::*;
