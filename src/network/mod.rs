//! Market data access and connection management

pub mod source;
pub mod client;
pub mod retry;

pub use source::*;
pub use client::*;
pub use retry::*;
