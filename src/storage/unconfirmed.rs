//! Unconfirmed transaction pool
//!
//! Transactions known to the node but not yet in a block, keyed by hash.

use std::collections::HashMap;

use crate::crypto::Hash;
use crate::validation::Transaction;

#[derive(Debug, Default, Clone)]
pub struct UnconfirmedPool {
    txns: HashMap<Hash, Transaction>,
}

impl UnconfirmedPool {
    pub fn new() -> Self {
        Self {
            txns: HashMap::new(),
        }
    }

    /// Add a transaction; returns false if it was already known
    pub fn inject(&mut self, tx: Transaction) -> bool {
        let hash = tx.hash();
        if self.txns.contains_key(&hash) {
            return false;
        }
        log::debug!("Unconfirmed transaction added: {}", hash);
        self.txns.insert(hash, tx);
        true
    }

    pub fn get(&self, hash: &Hash) -> Option<&Transaction> {
        self.txns.get(hash)
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.txns.contains_key(hash)
    }

    pub fn remove(&mut self, hash: &Hash) -> Option<Transaction> {
        self.txns.remove(hash)
    }

    /// Drop every transaction that was confirmed by a block
    pub fn remove_transactions(&mut self, txns: &[Transaction]) {
        for tx in txns {
            self.txns.remove(&tx.hash());
        }
    }

    pub fn len(&self) -> usize {
        self.txns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.txns.is_empty()
    }
}
