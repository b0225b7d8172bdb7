//! APY volatility and stability analysis

pub mod stability;

pub use stability::*;
