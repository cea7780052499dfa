//! Wallet module - Addresses, key management and transaction signing

mod address;
mod wallet;

pub use address::*;
pub use wallet::*;
