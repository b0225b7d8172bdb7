//! Data persistence and file operations

pub mod snapshots;

pub use snapshots::*;
