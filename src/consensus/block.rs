//! Block structure for the RH blockchain
//!
//! Defines the immutable block, block header and block body structures.

use serde::{Deserialize, Serialize};

use crate::constants::BLOCK_VERSION;
use crate::crypto::{compute_merkle_root, hash_bytes, Hash};
use crate::validation::Transaction;

/// Block header containing all metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockHeader {
    /// Protocol version
    pub version: u32,
    /// Block timestamp (seconds since Unix epoch)
    pub time: u64,
    /// Sequence number; genesis is 0
    pub bk_seq: u64,
    /// Total fee collected by the block's transactions
    pub fee: u64,
    /// Hash of the previous block header
    pub prev_hash: Hash,
    /// Hash of the block body
    pub body_hash: Hash,
}

impl BlockHeader {
    /// Header for a block following `prev`
    pub fn next(prev: &BlockHeader, body: &BlockBody, time: u64, fee: u64) -> Self {
        Self {
            version: prev.version,
            time,
            bk_seq: prev.bk_seq + 1,
            fee,
            prev_hash: prev.hash(),
            body_hash: body.hash(),
        }
    }

    /// Serialize the header for hashing
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(4 + 8 * 3 + 32 * 2);
        bytes.extend_from_slice(&self.version.to_le_bytes());
        bytes.extend_from_slice(&self.time.to_le_bytes());
        bytes.extend_from_slice(&self.bk_seq.to_le_bytes());
        bytes.extend_from_slice(&self.fee.to_le_bytes());
        bytes.extend_from_slice(&self.prev_hash.0);
        bytes.extend_from_slice(&self.body_hash.0);
        bytes
    }

    /// Calculate the hash of this header
    pub fn hash(&self) -> Hash {
        hash_bytes(&self.to_bytes())
    }
}

/// Transactions carried by a block
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockBody {
    pub transactions: Vec<Transaction>,
}

impl BlockBody {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    /// Merkle root of the transaction hashes
    pub fn hash(&self) -> Hash {
        let tx_hashes: Vec<Hash> = self.transactions.iter().map(|tx| tx.hash()).collect();
        compute_merkle_root(&tx_hashes)
    }
}

/// A complete block containing header and body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    pub head: BlockHeader,
    pub body: BlockBody,
}

impl Block {
    /// Create a new block on top of `prev`
    pub fn new(prev: &BlockHeader, transactions: Vec<Transaction>, time: u64, fee: u64) -> Self {
        let body = BlockBody::new(transactions);
        let head = BlockHeader::next(prev, &body, time, fee);
        Self { head, body }
    }

    /// Create the first block of a chain
    pub fn genesis(transactions: Vec<Transaction>, time: u64) -> Self {
        let body = BlockBody::new(transactions);
        let head = BlockHeader {
            version: BLOCK_VERSION,
            time,
            bk_seq: 0,
            fee: 0,
            prev_hash: Hash::zero(),
            body_hash: body.hash(),
        };
        Self { head, body }
    }

    /// Get the block hash
    pub fn hash(&self) -> Hash {
        self.head.hash()
    }

    /// Check if this is the genesis block
    pub fn is_genesis(&self) -> bool {
        self.head.bk_seq == 0 && self.head.prev_hash.is_zero()
    }
}
