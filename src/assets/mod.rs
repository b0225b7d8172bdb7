//! Token symbol canonicalization

pub mod normalizer;

pub use normalizer::*;
