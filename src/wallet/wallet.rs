//! Wallet implementation
//!
//! Handles key generation, output selection, and transaction signing.
//! The wallet does NOT affect consensus - bugs here cannot affect supply.

use std::collections::BTreeMap;
use thiserror::Error;

use super::Address;
use crate::crypto::{Hash, PrivateKey, PublicKey, SignatureError};
use crate::storage::{UnspentPool, UxOut};
use crate::validation::{Transaction, TransactionError, TransactionOutput};

/// Wallet errors
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Insufficient funds: have {have}, need {need}")]
    InsufficientFunds { have: u64, need: u64 },
    #[error("Insufficient coin hours: have {have}, need {need}")]
    InsufficientHours { have: u64, need: u64 },
    #[error("Cannot send zero coins")]
    ZeroAmount,
    #[error("Invalid private key")]
    InvalidKey(#[from] SignatureError),
    #[error("Signing error: {0}")]
    Signing(#[from] TransactionError),
}

/// A wallet key pair
#[derive(Debug, Clone)]
pub struct KeyPair {
    /// Private key (for signing)
    private_key: PrivateKey,
    /// Public key
    pub public_key: PublicKey,
    /// Address (derived from public key)
    pub address: Address,
}

impl KeyPair {
    fn from_private_key(private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();
        let address = Address::from_public_key(&public_key);
        Self {
            private_key,
            public_key,
            address,
        }
    }

    /// Generate a new random keypair
    pub fn generate() -> Self {
        Self::from_private_key(PrivateKey::generate())
    }

    /// Import from private key bytes
    pub fn from_private_key_bytes(bytes: &[u8; 32]) -> Result<Self, WalletError> {
        Ok(Self::from_private_key(PrivateKey::from_bytes(bytes)?))
    }

    /// Export private key bytes
    pub fn private_key_bytes(&self) -> [u8; 32] {
        self.private_key.to_bytes()
    }
}

/// A simple wallet
#[derive(Debug, Default)]
pub struct Wallet {
    /// Wallet keys, ordered by address
    keys: BTreeMap<Address, KeyPair>,
}

impl Wallet {
    /// Create a new empty wallet
    pub fn new() -> Self {
        Self {
            keys: BTreeMap::new(),
        }
    }

    /// Generate a new key and add to wallet
    pub fn generate_key(&mut self) -> Address {
        let keypair = KeyPair::generate();
        let address = keypair.address;
        self.keys.insert(address, keypair);
        address
    }

    /// Import a key
    pub fn import_key(&mut self, bytes: &[u8; 32]) -> Result<Address, WalletError> {
        let keypair = KeyPair::from_private_key_bytes(bytes)?;
        let address = keypair.address;
        self.keys.insert(address, keypair);
        Ok(address)
    }

    /// Get a keypair by address
    pub fn key_for(&self, address: &Address) -> Option<&KeyPair> {
        self.keys.get(address)
    }

    /// Get all addresses
    pub fn addresses(&self) -> Vec<Address> {
        self.keys.keys().copied().collect()
    }

    /// Get total balance across all keys
    pub fn balance(&self, unspent: &UnspentPool) -> u64 {
        self.keys
            .keys()
            .fold(0u64, |total, address| total.saturating_add(unspent.balance(address)))
    }

    /// Create and sign a transaction paying `coins` and `hours` to `recipient`
    ///
    /// Change goes back to the owner of the first selected output. Coin hours
    /// not assigned to an output are burned as the fee.
    pub fn create_transaction(
        &self,
        unspent: &UnspentPool,
        recipient: Address,
        coins: u64,
        hours: u64,
    ) -> Result<Transaction, WalletError> {
        if coins == 0 {
            return Err(WalletError::ZeroAmount);
        }

        // Collect outputs until both coins and hours are covered
        let mut selected: Vec<(&UxOut, &KeyPair)> = Vec::new();
        let mut total_coins: u64 = 0;
        let mut total_hours: u64 = 0;

        'select: for (address, keypair) in &self.keys {
            for ux in unspent.outputs_for(address) {
                if total_coins >= coins && total_hours >= hours {
                    break 'select;
                }
                selected.push((ux, keypair));
                total_coins = total_coins.saturating_add(ux.body.coins);
                total_hours = total_hours.saturating_add(ux.body.hours);
            }
        }

        if total_coins < coins {
            return Err(WalletError::InsufficientFunds {
                have: total_coins,
                need: coins,
            });
        }
        if total_hours < hours {
            return Err(WalletError::InsufficientHours {
                have: total_hours,
                need: hours,
            });
        }

        let mut outputs = vec![TransactionOutput::new(recipient, coins, hours)];

        let change = total_coins - coins;
        if change > 0 {
            if let Some((_, owner)) = selected.first() {
                outputs.push(TransactionOutput::new(owner.address, change, total_hours - hours));
            }
        }

        let inputs: Vec<Hash> = selected.iter().map(|(ux, _)| ux.hash()).collect();
        let keys: Vec<PrivateKey> = selected
            .iter()
            .map(|(_, keypair)| keypair.private_key.clone())
            .collect();

        let mut tx = Transaction::new(inputs, outputs);
        tx.sign_inputs(&keys)?;
        Ok(tx)
    }
}
