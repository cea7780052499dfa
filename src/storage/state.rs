//! Chain state management
//!
//! Tracks the blocks of the chain, the unspent output set, and an index of
//! confirmed transactions. Block acceptance only checks chaining and that
//! inputs are unspent and signed by their owners.

use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::consensus::{Block, BlockHeader};
use crate::crypto::Hash;
use crate::validation::{Transaction, TransactionError};
use super::{UnspentPool, UxHead};

/// Block execution errors
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Invalid block sequence: expected {expected}, got {got}")]
    InvalidSequence { expected: u64, got: u64 },
    #[error("Invalid previous hash")]
    InvalidPrevHash,
    #[error("Body hash does not match transactions")]
    InvalidBodyHash,
    #[error("Invalid transaction {index}: {source}")]
    InvalidTransaction {
        index: usize,
        #[source]
        source: TransactionError,
    },
    #[error("Transaction {index} spends unknown output {input}")]
    UnknownInput { index: usize, input: Hash },
    #[error("Transaction {index} spends output {input} twice in one block")]
    DoubleSpend { index: usize, input: Hash },
    #[error("Transaction {index} input {input_index} is not signed by the output owner")]
    WrongSigner { index: usize, input_index: usize },
}

/// Complete chain state
#[derive(Debug, Clone)]
pub struct ChainState {
    /// Blocks by sequence number; never empty
    blocks: Vec<Block>,
    /// Current unspent output set
    unspent: UnspentPool,
    /// Confirmed transaction hash -> block sequence
    tx_index: HashMap<Hash, u64>,
}

impl ChainState {
    /// Create a new chain state from genesis
    ///
    /// Genesis transactions are distributions and are applied unchecked.
    pub fn new(genesis: Block) -> Self {
        let mut state = Self {
            blocks: Vec::new(),
            unspent: UnspentPool::new(),
            tx_index: HashMap::new(),
        };
        state.apply_block(genesis);
        state
    }

    /// Header of the most recent block
    pub fn head(&self) -> &BlockHeader {
        &self.blocks[self.blocks.len() - 1].head
    }

    /// Number of blocks, including genesis
    pub fn len(&self) -> u64 {
        self.blocks.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block_by_seq(&self, seq: u64) -> Option<&Block> {
        self.blocks.get(usize::try_from(seq).ok()?)
    }

    pub fn unspent(&self) -> &UnspentPool {
        &self.unspent
    }

    /// A confirmed transaction and the sequence of its block
    pub fn transaction(&self, hash: &Hash) -> Option<(&Transaction, u64)> {
        let seq = *self.tx_index.get(hash)?;
        self.block_by_seq(seq)?
            .body
            .transactions
            .iter()
            .find(|tx| tx.hash() == *hash)
            .map(|tx| (tx, seq))
    }

    /// Number of blocks burying the block at `seq`, counting that block
    pub fn depth(&self, seq: u64) -> u64 {
        self.head().bk_seq.saturating_sub(seq) + 1
    }

    /// Coin hours consumed by `tx`, given the current unspent set
    pub fn transaction_fee(&self, tx: &Transaction) -> u64 {
        let input_hours = tx
            .inputs
            .iter()
            .filter_map(|input| self.unspent.get(input))
            .fold(0u64, |total, ux| total.saturating_add(ux.body.hours));
        input_hours.saturating_sub(tx.output_hours().unwrap_or(u64::MAX))
    }

    /// Build a block on top of the current head
    pub fn create_block(&self, transactions: Vec<Transaction>, time: u64) -> Block {
        let fee = transactions
            .iter()
            .fold(0u64, |total, tx| total.saturating_add(self.transaction_fee(tx)));
        Block::new(self.head(), transactions, time, fee)
    }

    /// Check that `block` can extend the chain
    pub fn validate_block(&self, block: &Block) -> Result<(), ChainError> {
        let head = self.head();

        let expected = head.bk_seq + 1;
        if block.head.bk_seq != expected {
            return Err(ChainError::InvalidSequence {
                expected,
                got: block.head.bk_seq,
            });
        }
        if block.head.prev_hash != head.hash() {
            return Err(ChainError::InvalidPrevHash);
        }
        if block.head.body_hash != block.body.hash() {
            return Err(ChainError::InvalidBodyHash);
        }

        let mut spent = HashSet::new();
        for (index, tx) in block.body.transactions.iter().enumerate() {
            tx.verify()
                .map_err(|source| ChainError::InvalidTransaction { index, source })?;

            for (input_index, input) in tx.inputs.iter().enumerate() {
                let ux = self.unspent.get(input).ok_or(ChainError::UnknownInput {
                    index,
                    input: *input,
                })?;
                if !spent.insert(*input) {
                    return Err(ChainError::DoubleSpend { index, input: *input });
                }

                let signer = tx
                    .signer(input_index)
                    .map_err(|source| ChainError::InvalidTransaction { index, source })?;
                if signer != ux.body.address {
                    return Err(ChainError::WrongSigner { index, input_index });
                }
            }
        }

        Ok(())
    }

    /// Validate and append a block
    pub fn execute_block(&mut self, block: Block) -> Result<(), ChainError> {
        if let Err(e) = self.validate_block(&block) {
            log::warn!("Rejected block {}: {}", block.head.bk_seq, e);
            return Err(e);
        }
        log::debug!(
            "Executing block {} with {} transactions",
            block.head.bk_seq,
            block.body.transactions.len()
        );
        self.apply_block(block);
        Ok(())
    }

    fn apply_block(&mut self, block: Block) {
        let head = UxHead {
            time: block.head.time,
            bk_seq: block.head.bk_seq,
        };

        for tx in &block.body.transactions {
            self.unspent.apply_transaction(tx, head);
            self.tx_index.insert(tx.hash(), block.head.bk_seq);
        }

        self.blocks.push(block);
    }
}
