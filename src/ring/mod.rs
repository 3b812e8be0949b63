pub mod buffer;
pub mod ring_error;
pub mod search;
pub mod transfer;

pub use buffer::{ExternalRing, OwnedRing, RingBuffer};
pub use ring_error::*;
