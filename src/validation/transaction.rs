//! Transaction structure and validation
//!
//! UTXO-based transactions spending unspent outputs by identifier. Each input
//! carries one recoverable signature over `hash(inner_hash || input)`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::constants::DEFAULT_TRANSACTION_TYPE;
use crate::crypto::{Hash, PrivateKey, Signature, SignatureError, hash_bytes, hash_pair, recover_public_key};
use crate::wallet::Address;

/// Structural verification and signing errors
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Transaction has no inputs")]
    NoInputs,
    #[error("Transaction has no outputs")]
    NoOutputs,
    #[error("Input/signature count mismatch: {inputs} inputs, {sigs} signatures")]
    SignatureCountMismatch { inputs: usize, sigs: usize },
    #[error("Duplicate input at index {0}")]
    DuplicateInput(usize),
    #[error("Duplicate output at index {0}")]
    DuplicateOutput(usize),
    #[error("Zero coin output at index {0}")]
    ZeroCoinOutput(usize),
    #[error("Output coins overflow")]
    CoinOverflow,
    #[error("Inner hash does not match transaction content")]
    InnerHashMismatch,
    #[error("Declared length {declared} does not match canonical size {actual}")]
    LengthMismatch { declared: u32, actual: u32 },
    #[error("Invalid transaction type {0}")]
    InvalidType(u8),
    #[error("Invalid signature for input {0}")]
    InvalidSignature(usize),
    #[error("Signing failed: {0}")]
    Signing(#[from] SignatureError),
}

/// A transaction output
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionOutput {
    /// Receiving address
    pub address: Address,
    /// Amount in base units
    pub coins: u64,
    /// Coin hours
    pub hours: u64,
}

impl TransactionOutput {
    pub fn new(address: Address, coins: u64, hours: u64) -> Self {
        Self { address, coins, hours }
    }

    fn write_bytes(&self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(self.address.key());
        bytes.extend_from_slice(&self.coins.to_le_bytes());
        bytes.extend_from_slice(&self.hours.to_le_bytes());
    }
}

/// A complete transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Size of the canonical encoding in bytes
    pub length: u32,
    /// Transaction type tag
    pub tx_type: u8,
    /// Hash of inputs and outputs; the value each signature commits to
    pub inner_hash: Hash,
    /// One signature per input, in input order
    pub sigs: Vec<Signature>,
    /// Identifiers of the unspent outputs being spent
    pub inputs: Vec<Hash>,
    /// Transaction outputs
    pub outputs: Vec<TransactionOutput>,
}

impl Transaction {
    /// Create an unsigned transaction with an up-to-date header
    pub fn new(inputs: Vec<Hash>, outputs: Vec<TransactionOutput>) -> Self {
        let mut tx = Self {
            length: 0,
            tx_type: DEFAULT_TRANSACTION_TYPE,
            inner_hash: Hash::zero(),
            sigs: Vec::new(),
            inputs,
            outputs,
        };
        tx.update_header();
        tx
    }

    /// Recompute the derived header fields: inner hash, length and type
    pub fn update_header(&mut self) {
        self.inner_hash = self.hash_inner();
        self.length = self.size();
        self.tx_type = DEFAULT_TRANSACTION_TYPE;
    }

    /// Sign every input, `keys[i]` signing `inputs[i]`
    ///
    /// Replaces any existing signatures and refreshes the header.
    pub fn sign_inputs(&mut self, keys: &[PrivateKey]) -> Result<(), TransactionError> {
        if keys.len() != self.inputs.len() {
            return Err(TransactionError::SignatureCountMismatch {
                inputs: self.inputs.len(),
                sigs: keys.len(),
            });
        }

        let inner_hash = self.hash_inner();
        self.sigs = self
            .inputs
            .iter()
            .zip(keys)
            .map(|(input, key)| key.sign(&hash_pair(&inner_hash, input)))
            .collect::<Result<_, _>>()?;

        self.update_header();
        Ok(())
    }

    /// Hash signed by the input at `index`
    pub fn signing_hash(&self, index: usize) -> Option<Hash> {
        self.inputs
            .get(index)
            .map(|input| hash_pair(&self.inner_hash, input))
    }

    /// Address that produced the signature for input `index`
    pub fn signer(&self, index: usize) -> Result<Address, TransactionError> {
        let (signing_hash, sig) = self
            .signing_hash(index)
            .zip(self.sigs.get(index))
            .ok_or(TransactionError::InvalidSignature(index))?;

        recover_public_key(&signing_hash, sig)
            .map(|key| Address::from_public_key(&key))
            .map_err(|_| TransactionError::InvalidSignature(index))
    }

    /// Serialize inputs and outputs (the signed content)
    fn inner_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();

        bytes.extend_from_slice(&(self.inputs.len() as u32).to_le_bytes());
        for input in &self.inputs {
            bytes.extend_from_slice(&input.0);
        }

        bytes.extend_from_slice(&(self.outputs.len() as u32).to_le_bytes());
        for output in &self.outputs {
            output.write_bytes(&mut bytes);
        }

        bytes
    }

    /// Canonical byte encoding
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();

        bytes.extend_from_slice(&self.length.to_le_bytes());
        bytes.push(self.tx_type);
        bytes.extend_from_slice(&self.inner_hash.0);

        bytes.extend_from_slice(&(self.sigs.len() as u32).to_le_bytes());
        for sig in &self.sigs {
            bytes.extend_from_slice(&sig.0);
        }

        bytes.extend_from_slice(&self.inner_bytes());
        bytes
    }

    /// Size of the canonical encoding
    pub fn size(&self) -> u32 {
        self.to_bytes().len() as u32
    }

    /// Content hash of the full canonical encoding
    pub fn hash(&self) -> Hash {
        hash_bytes(&self.to_bytes())
    }

    /// Hash of inputs and outputs, excluding header and signatures
    pub fn hash_inner(&self) -> Hash {
        hash_bytes(&self.inner_bytes())
    }

    /// Total output coins, `None` on overflow
    pub fn output_coins(&self) -> Option<u64> {
        self.outputs
            .iter()
            .try_fold(0u64, |total, output| total.checked_add(output.coins))
    }

    /// Total output hours, `None` on overflow
    pub fn output_hours(&self) -> Option<u64> {
        self.outputs
            .iter()
            .try_fold(0u64, |total, output| total.checked_add(output.hours))
    }

    /// Structural verification
    ///
    /// Checks everything that can be checked without the unspent set:
    /// shape, derived header fields, and that every signature is a valid
    /// recoverable signature over its input's signing hash.
    pub fn verify(&self) -> Result<(), TransactionError> {
        if self.inputs.is_empty() {
            return Err(TransactionError::NoInputs);
        }
        if self.outputs.is_empty() {
            return Err(TransactionError::NoOutputs);
        }
        if self.sigs.len() != self.inputs.len() {
            return Err(TransactionError::SignatureCountMismatch {
                inputs: self.inputs.len(),
                sigs: self.sigs.len(),
            });
        }

        let mut seen_inputs = HashSet::new();
        for (index, input) in self.inputs.iter().enumerate() {
            if !seen_inputs.insert(input) {
                return Err(TransactionError::DuplicateInput(index));
            }
        }

        let mut seen_outputs = HashSet::new();
        for (index, output) in self.outputs.iter().enumerate() {
            if output.coins == 0 {
                return Err(TransactionError::ZeroCoinOutput(index));
            }
            if !seen_outputs.insert(output) {
                return Err(TransactionError::DuplicateOutput(index));
            }
        }
        if self.output_coins().is_none() {
            return Err(TransactionError::CoinOverflow);
        }

        if self.tx_type != DEFAULT_TRANSACTION_TYPE {
            return Err(TransactionError::InvalidType(self.tx_type));
        }
        let actual = self.size();
        if self.length != actual {
            return Err(TransactionError::LengthMismatch {
                declared: self.length,
                actual,
            });
        }
        if self.inner_hash != self.hash_inner() {
            return Err(TransactionError::InnerHashMismatch);
        }

        for index in 0..self.inputs.len() {
            self.signer(index)?;
        }

        Ok(())
    }
}
