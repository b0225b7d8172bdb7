//! Core data types and structures

pub mod pools;
pub mod liquidity;
pub mod stability;
pub mod spreads;
pub mod relationships;

pub use pools::*;
pub use liquidity::*;
pub use stability::*;
pub use spreads::*;
pub use relationships::*;
