//! Checksummed RH addresses
//!
//! Address format: "RH" + Base58(key[0:20] + checksum[0:4]), where the key is
//! the truncated BLAKE3 hash of the compressed public key and the checksum is
//! the first four bytes of its double hash.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::{ADDRESS_CHECKSUM_SIZE, ADDRESS_KEY_SIZE, ADDRESS_PREFIX};
use crate::crypto::{double_hash, hash_bytes, PublicKey};

/// Address decoding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("Invalid address prefix")]
    InvalidPrefix,
    #[error("Invalid base58 encoding")]
    InvalidBase58,
    #[error("Invalid address length: {0} bytes")]
    InvalidLength(usize),
    #[error("Invalid checksum")]
    InvalidChecksum,
}

/// Owner of an output, derived from a public key
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Address {
    key: [u8; ADDRESS_KEY_SIZE],
}

impl Address {
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let hash = hash_bytes(&public_key.0);
        let mut key = [0u8; ADDRESS_KEY_SIZE];
        key.copy_from_slice(&hash.0[..ADDRESS_KEY_SIZE]);
        Self { key }
    }

    /// Raw key bytes, as written into canonical encodings
    pub fn key(&self) -> &[u8; ADDRESS_KEY_SIZE] {
        &self.key
    }

    fn checksum(&self) -> [u8; ADDRESS_CHECKSUM_SIZE] {
        let hash = double_hash(&self.key);
        let mut checksum = [0u8; ADDRESS_CHECKSUM_SIZE];
        checksum.copy_from_slice(&hash.0[..ADDRESS_CHECKSUM_SIZE]);
        checksum
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut with_checksum = Vec::with_capacity(ADDRESS_KEY_SIZE + ADDRESS_CHECKSUM_SIZE);
        with_checksum.extend_from_slice(&self.key);
        with_checksum.extend_from_slice(&self.checksum());

        write!(f, "{}{}", ADDRESS_PREFIX, bs58::encode(&with_checksum).into_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let encoded = s
            .strip_prefix(ADDRESS_PREFIX)
            .ok_or(AddressError::InvalidPrefix)?;

        let decoded = bs58::decode(encoded)
            .into_vec()
            .map_err(|_| AddressError::InvalidBase58)?;

        if decoded.len() != ADDRESS_KEY_SIZE + ADDRESS_CHECKSUM_SIZE {
            return Err(AddressError::InvalidLength(decoded.len()));
        }

        let (key_bytes, checksum) = decoded.split_at(ADDRESS_KEY_SIZE);
        let mut key = [0u8; ADDRESS_KEY_SIZE];
        key.copy_from_slice(key_bytes);

        let address = Address { key };
        if checksum != address.checksum() {
            return Err(AddressError::InvalidChecksum);
        }

        Ok(address)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PrivateKey;

    fn make_address() -> Address {
        Address::from_public_key(&PrivateKey::generate().public_key())
    }

    #[test]
    fn test_address_generation() {
        let address = make_address().to_string();
        assert!(address.starts_with("RH"));
        assert!(address.len() > 10);
    }

    #[test]
    fn test_address_text_roundtrip() {
        let address = make_address();
        let parsed: Address = address.to_string().parse().unwrap();
        assert_eq!(parsed, address);
    }

    #[test]
    fn test_missing_prefix_rejected() {
        let text = make_address().to_string();
        assert_eq!(text[2..].parse::<Address>(), Err(AddressError::InvalidPrefix));
    }

    #[test]
    fn test_invalid_base58_rejected() {
        // '0' is not in the base58 alphabet
        assert_eq!("RH0OIl".parse::<Address>(), Err(AddressError::InvalidBase58));
    }

    #[test]
    fn test_wrong_length_rejected() {
        let short = format!("RH{}", bs58::encode([1u8; 10]).into_string());
        assert_eq!(short.parse::<Address>(), Err(AddressError::InvalidLength(10)));
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let address = make_address();
        let mut bytes = address.key().to_vec();
        bytes.extend_from_slice(&[0u8; ADDRESS_CHECKSUM_SIZE]);
        let forged = format!("RH{}", bs58::encode(&bytes).into_string());

        // A zero checksum is astronomically unlikely to be the real one
        if forged != address.to_string() {
            assert_eq!(forged.parse::<Address>(), Err(AddressError::InvalidChecksum));
        }
    }

    #[test]
    fn test_serde_uses_text_form() {
        let address = make_address();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{}\"", address));

        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}
