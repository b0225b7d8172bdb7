//! Pool processing, liquidity modeling and ranking

pub mod liquidity;
pub mod processor;
pub mod query;

pub use liquidity::*;
pub use processor::*;
pub use query::*;
