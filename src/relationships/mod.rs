//! Protocol-to-protocol relationship graph

pub mod graph;

pub use graph::*;
