//! End-to-end fetch and analysis cycle

pub mod cycle;

pub use cycle::*;
