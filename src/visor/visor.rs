//! Visor: read-mostly view over the chain and the unconfirmed pool
//!
//! Chain and pool live under one `RwLock`, so every query that combines
//! them (snapshots, transaction status) sees a single point in time.

use std::num::NonZeroU64;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{
    readable_outputs, BlockchainMetadata, ReadableBlock, ReadableOutput, ReadableTransaction,
    TransactionStatus, TransactionWithStatus,
};
use crate::consensus::Block;
use crate::crypto::Hash;
use crate::storage::{ChainError, ChainState, UnconfirmedPool};
use crate::validation::Transaction;
use crate::wallet::Address;

#[derive(Debug)]
pub struct VisorState {
    pub chain: ChainState,
    pub unconfirmed: UnconfirmedPool,
}

impl VisorState {
    pub fn new(genesis: Block) -> Self {
        Self {
            chain: ChainState::new(genesis),
            unconfirmed: UnconfirmedPool::new(),
        }
    }

    pub fn metadata(&self) -> BlockchainMetadata {
        BlockchainMetadata::new(&self.chain, &self.unconfirmed)
    }

    pub fn transaction_status(&self, hash: &Hash) -> TransactionStatus {
        if let Some((_, seq)) = self.chain.transaction(hash) {
            if let Some(height) = NonZeroU64::new(self.chain.depth(seq)) {
                return TransactionStatus::Confirmed { height };
            }
        }
        if self.unconfirmed.contains(hash) {
            return TransactionStatus::Unconfirmed;
        }
        TransactionStatus::Unknown
    }

    pub fn transaction(&self, hash: &Hash) -> Option<TransactionWithStatus> {
        let tx = self
            .chain
            .transaction(hash)
            .map(|(tx, _)| tx)
            .or_else(|| self.unconfirmed.get(hash))?;

        Some(TransactionWithStatus {
            txn: ReadableTransaction::from(tx),
            status: self.transaction_status(hash),
        })
    }
}

#[derive(Debug)]
pub struct Visor {
    state: RwLock<VisorState>,
}

impl Visor {
    pub fn new(genesis: Block) -> Self {
        Self {
            state: RwLock::new(VisorState::new(genesis)),
        }
    }

    /// Shared guard over chain and pool
    pub fn read(&self) -> RwLockReadGuard<'_, VisorState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, VisorState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of head, unspent count and unconfirmed count under one read lock
    pub fn metadata(&self) -> BlockchainMetadata {
        self.read().metadata()
    }

    pub fn transaction_status(&self, hash: &Hash) -> TransactionStatus {
        self.read().transaction_status(hash)
    }

    pub fn transaction(&self, hash: &Hash) -> Option<TransactionWithStatus> {
        self.read().transaction(hash)
    }

    pub fn block(&self, seq: u64) -> Option<ReadableBlock> {
        self.read().chain.block_by_seq(seq).map(ReadableBlock::from)
    }

    pub fn outputs_for(&self, address: &Address) -> Vec<ReadableOutput> {
        readable_outputs(self.read().chain.unspent().outputs_for(address))
    }

    /// Add a transaction to the unconfirmed pool; false if already known
    pub fn inject_transaction(&self, tx: Transaction) -> bool {
        self.write().unconfirmed.inject(tx)
    }

    /// Block on top of the head carrying the given transactions
    pub fn create_block(&self, transactions: Vec<Transaction>, time: u64) -> Block {
        self.read().chain.create_block(transactions, time)
    }

    /// Append a block and drop its transactions from the unconfirmed pool
    pub fn execute_block(&self, block: Block) -> Result<(), ChainError> {
        let mut state = self.write();
        let transactions = block.body.transactions.clone();
        state.chain.execute_block(block)?;
        state.unconfirmed.remove_transactions(&transactions);
        Ok(())
    }
}
