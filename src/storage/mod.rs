//! Storage module - Unspent output set, unconfirmed pool and chain state

mod utxo;
mod state;
mod unconfirmed;

pub use utxo::*;
pub use state::*;
pub use unconfirmed::*;
