//! Readable forms of ledger entities
//!
//! Display-only JSON views: hashes and signatures become fixed-length hex,
//! addresses their checksummed text, numbers are copied as-is. Every view
//! owns its data and preserves the element order of its source.

use serde::{Deserialize, Serialize};

use crate::consensus::{Block, BlockBody, BlockHeader};
use crate::storage::UxOut;
use crate::validation::{Transaction, TransactionOutput};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadableTransactionOutput {
    #[serde(rename = "dst")]
    pub address: String,
    pub coins: u64,
    pub hours: u64,
}

impl From<&TransactionOutput> for ReadableTransactionOutput {
    fn from(output: &TransactionOutput) -> Self {
        Self {
            address: output.address.to_string(),
            coins: output.coins,
            hours: output.hours,
        }
    }
}

/// An unspent output, identified by its hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadableOutput {
    pub hash: String,
    pub address: String,
    pub coins: u64,
    pub hours: u64,
}

impl From<&UxOut> for ReadableOutput {
    fn from(ux: &UxOut) -> Self {
        Self {
            hash: ux.hash().to_hex(),
            address: ux.body.address.to_string(),
            coins: ux.body.coins,
            hours: ux.body.hours,
        }
    }
}

/// Map a sequence of unspent outputs, keeping their order
pub fn readable_outputs<'a, I>(outputs: I) -> Vec<ReadableOutput>
where
    I: IntoIterator<Item = &'a UxOut>,
{
    outputs.into_iter().map(ReadableOutput::from).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadableTransaction {
    pub length: u32,
    #[serde(rename = "type")]
    pub tx_type: u8,
    pub hash: String,
    pub inner_hash: String,
    pub sigs: Vec<String>,
    pub inputs: Vec<String>,
    pub outputs: Vec<ReadableTransactionOutput>,
}

impl From<&Transaction> for ReadableTransaction {
    fn from(tx: &Transaction) -> Self {
        Self {
            length: tx.length,
            tx_type: tx.tx_type,
            hash: tx.hash().to_hex(),
            inner_hash: tx.inner_hash.to_hex(),
            sigs: tx.sigs.iter().map(|sig| sig.to_hex()).collect(),
            inputs: tx.inputs.iter().map(|input| input.to_hex()).collect(),
            outputs: tx.outputs.iter().map(ReadableTransactionOutput::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadableBlockHeader {
    pub version: u32,
    #[serde(rename = "timestamp")]
    pub time: u64,
    #[serde(rename = "seq")]
    pub bk_seq: u64,
    pub fee: u64,
    pub prev_hash: String,
    /// Body hash
    #[serde(rename = "hash")]
    pub body_hash: String,
}

impl From<&BlockHeader> for ReadableBlockHeader {
    fn from(header: &BlockHeader) -> Self {
        Self {
            version: header.version,
            time: header.time,
            bk_seq: header.bk_seq,
            fee: header.fee,
            prev_hash: header.prev_hash.to_hex(),
            body_hash: header.body_hash.to_hex(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadableBlockBody {
    #[serde(rename = "txns")]
    pub transactions: Vec<ReadableTransaction>,
}

impl From<&BlockBody> for ReadableBlockBody {
    fn from(body: &BlockBody) -> Self {
        Self {
            transactions: body.transactions.iter().map(ReadableTransaction::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadableBlock {
    #[serde(rename = "header")]
    pub head: ReadableBlockHeader,
    pub body: ReadableBlockBody,
}

impl From<&Block> for ReadableBlock {
    fn from(block: &Block) -> Self {
        Self {
            head: ReadableBlockHeader::from(&block.head),
            body: ReadableBlockBody::from(&block.body),
        }
    }
}
