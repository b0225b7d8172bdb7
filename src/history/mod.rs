//! Rate-limited historical APY retrieval

pub mod fetcher;
pub mod progress;

pub use fetcher::*;
pub use progress::*;
