//! Transaction JSON codec
//!
//! The only two-way text boundary: encoding refuses transactions that fail
//! structural verification, decoding validates every field and recomputes
//! the derived header (inner hash, length, type) instead of trusting it.
//! Decoding does not verify; call [`Transaction::verify`] on the result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::DEFAULT_TRANSACTION_TYPE;
use crate::crypto::{Hash, Signature};
use crate::validation::{Transaction, TransactionError, TransactionOutput};
use crate::wallet::{Address, AddressError};

/// Codec errors
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Transaction invalid, cannot serialize to JSON: {0}")]
    VerificationFailed(#[source] TransactionError),
    #[error("Malformed transaction document: {0}")]
    MalformedDocument(#[source] serde_json::Error),
    #[error("Invalid signature encoding at sigs[{index}]: {source}")]
    InvalidSignatureEncoding {
        index: usize,
        #[source]
        source: hex::FromHexError,
    },
    #[error("Invalid input encoding at in[{index}]: {source}")]
    InvalidInputEncoding {
        index: usize,
        #[source]
        source: hex::FromHexError,
    },
    #[error("Invalid address encoding at out[{index}]: {source}")]
    InvalidAddressEncoding {
        index: usize,
        #[source]
        source: AddressError,
    },
    #[error("Input/signature count mismatch: {inputs} inputs, {sigs} signatures")]
    InputSignatureCountMismatch { inputs: usize, sigs: usize },
    #[error("Cannot serialize transaction as JSON: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutputJson {
    /// Address of receiver
    pub address: String,
    /// Number of coins
    pub coins: u64,
    /// Coin hours
    pub hours: u64,
}

impl From<&TransactionOutput> for TransactionOutputJson {
    fn from(output: &TransactionOutput) -> Self {
        Self {
            address: output.address.to_string(),
            coins: output.coins,
            hours: output.hours,
        }
    }
}

impl TransactionOutputJson {
    pub fn to_output(&self) -> Result<TransactionOutput, AddressError> {
        let address: Address = self.address.parse()?;
        Ok(TransactionOutput::new(address, self.coins, self.hours))
    }
}

/// Self-describing transaction document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionJson {
    pub hash: String,
    pub inner_hash: String,
    pub sigs: Vec<String>,
    #[serde(rename = "in")]
    pub inputs: Vec<String>,
    #[serde(rename = "out")]
    pub outputs: Vec<TransactionOutputJson>,
}

impl TryFrom<&Transaction> for TransactionJson {
    type Error = CodecError;

    fn try_from(tx: &Transaction) -> Result<Self, Self::Error> {
        tx.verify().map_err(CodecError::VerificationFailed)?;

        Ok(Self {
            hash: tx.hash().to_hex(),
            inner_hash: tx.inner_hash.to_hex(),
            sigs: tx.sigs.iter().map(|sig| sig.to_hex()).collect(),
            inputs: tx.inputs.iter().map(|input| input.to_hex()).collect(),
            outputs: tx.outputs.iter().map(TransactionOutputJson::from).collect(),
        })
    }
}

impl TransactionJson {
    /// Rebuild the transaction described by this document
    ///
    /// The document's `hash` and `inner_hash` are ignored; all derived
    /// fields are recomputed from signatures, inputs and outputs.
    pub fn to_transaction(&self) -> Result<Transaction, CodecError> {
        let sigs = self
            .sigs
            .iter()
            .enumerate()
            .map(|(index, sig)| {
                Signature::from_hex(sig)
                    .map_err(|source| CodecError::InvalidSignatureEncoding { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let inputs = self
            .inputs
            .iter()
            .enumerate()
            .map(|(index, input)| {
                Hash::from_hex(input)
                    .map_err(|source| CodecError::InvalidInputEncoding { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let outputs = self
            .outputs
            .iter()
            .enumerate()
            .map(|(index, output)| {
                output
                    .to_output()
                    .map_err(|source| CodecError::InvalidAddressEncoding { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if inputs.len() != sigs.len() {
            return Err(CodecError::InputSignatureCountMismatch {
                inputs: inputs.len(),
                sigs: sigs.len(),
            });
        }

        let mut tx = Transaction {
            length: 0,
            tx_type: DEFAULT_TRANSACTION_TYPE,
            inner_hash: Hash::zero(),
            sigs,
            inputs,
            outputs,
        };
        tx.update_header();
        Ok(tx)
    }
}

/// Encode a verified transaction as a pretty-printed JSON document
pub fn encode_transaction(tx: &Transaction) -> Result<String, CodecError> {
    let document = TransactionJson::try_from(tx).map_err(|e| {
        log::warn!("Refusing to encode transaction {}: {}", tx.hash(), e);
        e
    })?;

    serde_json::to_string_pretty(&document).map_err(CodecError::Serialize)
}

/// Decode a transaction from its JSON document
pub fn decode_transaction(text: &str) -> Result<Transaction, CodecError> {
    let document: TransactionJson =
        serde_json::from_str(text).map_err(CodecError::MalformedDocument)?;

    let tx = document.to_transaction().map_err(|e| {
        log::debug!("Rejected transaction document: {}", e);
        e
    })?;

    log::debug!("Decoded transaction {}", tx.hash());
    Ok(tx)
}
