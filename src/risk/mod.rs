//! Composite pool risk scoring

pub mod scorer;
pub mod dependencies;

pub use scorer::*;
pub use dependencies::*;
