//! Validation module - Transaction structure, canonical encoding and verification

mod transaction;

pub use transaction::*;
