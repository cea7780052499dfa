//! Genesis block generation for ROHO (RH) blockchain
//!
//! The genesis block carries a single distribution transaction with no
//! inputs, crediting the whole initial supply to one address.

use crate::consensus::Block;
use crate::validation::{Transaction, TransactionOutput};
use crate::wallet::Address;

/// Create the genesis block
///
/// Reproducible byte-for-byte for the same arguments.
pub fn create_genesis_block(address: Address, coins: u64, hours: u64, timestamp: u64) -> Block {
    let distribution = Transaction::new(
        vec![],
        vec![TransactionOutput::new(address, coins, hours)],
    );

    Block::genesis(vec![distribution], timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{hash_bytes, PrivateKey};

    fn founder() -> Address {
        let key = PrivateKey::from_bytes(&hash_bytes(b"founder").0).unwrap();
        Address::from_public_key(&key.public_key())
    }

    #[test]
    fn test_genesis_is_deterministic() {
        let genesis1 = create_genesis_block(founder(), 100, 10, 1736339922);
        let genesis2 = create_genesis_block(founder(), 100, 10, 1736339922);

        assert_eq!(genesis1.hash(), genesis2.hash());
    }

    #[test]
    fn test_genesis_has_distribution() {
        let genesis = create_genesis_block(founder(), 100, 10, 1736339922);

        assert!(genesis.is_genesis());
        assert_eq!(genesis.body.transactions.len(), 1);
        assert_eq!(genesis.body.transactions[0].output_coins(), Some(100));
        assert_eq!(genesis.head.body_hash, genesis.body.hash());
    }
}
