//! Node module - Genesis block construction

mod genesis;

pub use genesis::*;
