//! Unspent output set implementation
//!
//! In-memory database of unspent transaction outputs, keyed by the output
//! identifier (the hash of its body).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::crypto::{hash_bytes, Hash};
use crate::validation::Transaction;
use crate::wallet::Address;

/// Where and when an unspent output was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UxHead {
    /// Time of the block that created the output
    pub time: u64,
    /// Sequence number of the block that created the output
    pub bk_seq: u64,
}

/// Content of an unspent output; its hash is the output identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UxBody {
    /// Transaction that created this output
    pub src_transaction: Hash,
    pub address: Address,
    pub coins: u64,
    pub hours: u64,
}

impl UxBody {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(32 + 20 + 8 + 8);
        bytes.extend_from_slice(&self.src_transaction.0);
        bytes.extend_from_slice(self.address.key());
        bytes.extend_from_slice(&self.coins.to_le_bytes());
        bytes.extend_from_slice(&self.hours.to_le_bytes());
        bytes
    }

    pub fn hash(&self) -> Hash {
        hash_bytes(&self.to_bytes())
    }
}

/// Unspent transaction output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UxOut {
    pub head: UxHead,
    pub body: UxBody,
}

impl UxOut {
    /// Output identifier, a pure function of the body
    pub fn hash(&self) -> Hash {
        self.body.hash()
    }

    /// Unspent outputs created by `tx` in the block described by `head`
    pub fn from_transaction(tx: &Transaction, head: UxHead) -> Vec<UxOut> {
        let src_transaction = tx.hash();
        tx.outputs
            .iter()
            .map(|output| UxOut {
                head,
                body: UxBody {
                    src_transaction,
                    address: output.address,
                    coins: output.coins,
                    hours: output.hours,
                },
            })
            .collect()
    }
}

/// Set of all unspent transaction outputs
#[derive(Debug, Default, Clone)]
pub struct UnspentPool {
    /// Map from output identifier to output
    pool: HashMap<Hash, UxOut>,
}

impl UnspentPool {
    /// Create a new empty unspent set
    pub fn new() -> Self {
        Self {
            pool: HashMap::new(),
        }
    }

    /// Check if an output exists
    pub fn contains(&self, hash: &Hash) -> bool {
        self.pool.contains_key(hash)
    }

    /// Get an output if it exists
    pub fn get(&self, hash: &Hash) -> Option<&UxOut> {
        self.pool.get(hash)
    }

    /// Add an output, keyed by its identifier
    pub fn add(&mut self, ux: UxOut) -> Hash {
        let hash = ux.hash();
        self.pool.insert(hash, ux);
        hash
    }

    /// Remove an output (when spent)
    pub fn remove(&mut self, hash: &Hash) -> Option<UxOut> {
        self.pool.remove(hash)
    }

    /// Apply a transaction to the unspent set
    ///
    /// Removes spent outputs and adds new outputs.
    pub fn apply_transaction(&mut self, tx: &Transaction, head: UxHead) {
        for input in &tx.inputs {
            self.remove(input);
        }

        for ux in UxOut::from_transaction(tx, head) {
            self.add(ux);
        }
    }

    /// All outputs owned by `address`, ordered by identifier
    pub fn outputs_for(&self, address: &Address) -> Vec<&UxOut> {
        let mut outputs: Vec<&UxOut> = self
            .pool
            .values()
            .filter(|ux| ux.body.address == *address)
            .collect();
        outputs.sort_by_key(|ux| ux.hash());
        outputs
    }

    /// Total coins owned by `address`
    pub fn balance(&self, address: &Address) -> u64 {
        self.pool
            .values()
            .filter(|ux| ux.body.address == *address)
            .fold(0u64, |total, ux| total.saturating_add(ux.body.coins))
    }

    /// Get total number of unspent outputs
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}
