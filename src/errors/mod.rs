//! Error types for the analytics engine

pub mod engine_error;

pub use engine_error::*;
