pub mod hook;

pub use hook::*;
