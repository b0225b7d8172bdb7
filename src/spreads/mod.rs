//! Cross-protocol yield spread detection

pub mod detector;

pub use detector::*;
