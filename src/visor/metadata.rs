//! Chain snapshot
//!
//! `BlockchainMetadata` aggregates the head header, unspent output count and
//! unconfirmed transaction count. It holds no state of its own; the caller
//! must hand in collaborators that are not being mutated for the duration
//! of the call (shared borrows, or guards taken under one lock).

use serde::{Deserialize, Serialize};

use super::ReadableBlockHeader;
use crate::consensus::BlockHeader;
use crate::storage::{ChainState, UnconfirmedPool};

/// Read access to the chain needed for a snapshot
pub trait ChainReader {
    /// Header of the most recent block
    fn head(&self) -> &BlockHeader;
    /// Number of entries in the unspent output set
    fn unspent_count(&self) -> u64;
}

/// Read access to the unconfirmed transaction pool
pub trait UnconfirmedReader {
    fn unconfirmed_count(&self) -> u64;
}

impl ChainReader for ChainState {
    fn head(&self) -> &BlockHeader {
        ChainState::head(self)
    }

    fn unspent_count(&self) -> u64 {
        self.unspent().len() as u64
    }
}

impl UnconfirmedReader for UnconfirmedPool {
    fn unconfirmed_count(&self) -> u64 {
        self.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockchainMetadata {
    /// Most recent block's header
    pub head: ReadableBlockHeader,
    /// Number of unspent outputs
    pub unspents: u64,
    /// Number of known unconfirmed transactions
    pub unconfirmed: u64,
}

impl BlockchainMetadata {
    pub fn new<C, U>(chain: &C, unconfirmed: &U) -> Self
    where
        C: ChainReader + ?Sized,
        U: UnconfirmedReader + ?Sized,
    {
        Self {
            head: ReadableBlockHeader::from(chain.head()),
            unspents: chain.unspent_count(),
            unconfirmed: unconfirmed.unconfirmed_count(),
        }
    }
}
