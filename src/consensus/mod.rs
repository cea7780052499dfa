//! Consensus module - Block structure

mod block;

pub use block::*;
