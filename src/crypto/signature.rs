//! Recoverable signature implementation
//!
//! Uses secp256k1 ECDSA with a trailing recovery id, so a signature alone is
//! enough to recover the signer's public key (and therefore its address).

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::hash::decode_lower_hex;
use super::Hash;
use crate::constants::SIGNATURE_SIZE;

/// Size of a compressed SEC1 public key
pub const PUBLIC_KEY_SIZE: usize = 33;

/// Signature errors
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Invalid public key")]
    InvalidPublicKey,
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Signing failed: {0}")]
    SigningFailed(String),
}

/// 32-byte private key
#[derive(Clone)]
pub struct PrivateKey(SigningKey);

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey([REDACTED])")
    }
}

/// 33-byte compressed public key
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey(#[serde(with = "fixed_bytes")] pub [u8; PUBLIC_KEY_SIZE]);

/// 65-byte recoverable signature: compact `r || s` followed by the recovery id
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature(#[serde(with = "fixed_bytes")] pub [u8; SIGNATURE_SIZE]);

mod fixed_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S, const N: usize>(bytes: &[u8; N], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(bytes)
    }

    pub fn deserialize<'de, D, const N: usize>(deserializer: D) -> Result<[u8; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes: Vec<u8> = Deserialize::deserialize(deserializer)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("Invalid fixed-size byte length"))
    }
}

impl PrivateKey {
    /// Generate a new random private key
    pub fn generate() -> Self {
        PrivateKey(SigningKey::random(&mut OsRng))
    }

    /// Create from 32 bytes
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, SignatureError> {
        SigningKey::from_slice(bytes)
            .map(PrivateKey)
            .map_err(|_| SignatureError::InvalidPrivateKey)
    }

    /// Get the corresponding public key
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(self.0.verifying_key())
    }

    /// Sign a 32-byte message hash
    pub fn sign(&self, message: &Hash) -> Result<Signature, SignatureError> {
        let (signature, recovery_id) = self
            .0
            .sign_prehash_recoverable(&message.0)
            .map_err(|e| SignatureError::SigningFailed(e.to_string()))?;

        let mut bytes = [0u8; SIGNATURE_SIZE];
        bytes[..SIGNATURE_SIZE - 1].copy_from_slice(&signature.to_bytes());
        bytes[SIGNATURE_SIZE - 1] = recovery_id.to_byte();
        Ok(Signature(bytes))
    }

    /// Export to bytes
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes().into()
    }
}

impl PublicKey {
    fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(true);
        let mut bytes = [0u8; PUBLIC_KEY_SIZE];
        bytes.copy_from_slice(point.as_bytes());
        PublicKey(bytes)
    }

    /// Create from 33 compressed SEC1 bytes
    pub fn from_bytes(bytes: &[u8; PUBLIC_KEY_SIZE]) -> Result<Self, SignatureError> {
        k256::PublicKey::from_sec1_bytes(bytes)
            .map_err(|_| SignatureError::InvalidPublicKey)?;
        Ok(PublicKey(*bytes))
    }

    /// Verify that `signature` over `message` was produced by this key
    pub fn verify(&self, message: &Hash, signature: &Signature) -> bool {
        recover_public_key(message, signature)
            .map(|recovered| recovered == *self)
            .unwrap_or(false)
    }

    /// Export to bytes
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.0
    }
}

impl Signature {
    /// Create from 65 bytes
    pub fn from_bytes(bytes: &[u8; SIGNATURE_SIZE]) -> Self {
        Signature(*bytes)
    }

    /// Create from a fixed-length lowercase hex string
    pub fn from_hex(hex: &str) -> Result<Self, hex::FromHexError> {
        let mut arr = [0u8; SIGNATURE_SIZE];
        decode_lower_hex(hex, &mut arr)?;
        Ok(Signature(arr))
    }

    /// Convert to lowercase hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Export to bytes
    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE] {
        self.0
    }
}

/// Recover the public key that produced `signature` over `message`
///
/// Fails if the signature is not a well-formed recoverable signature for
/// this message hash.
pub fn recover_public_key(message: &Hash, signature: &Signature) -> Result<PublicKey, SignatureError> {
    let compact = EcdsaSignature::from_slice(&signature.0[..SIGNATURE_SIZE - 1])
        .map_err(|_| SignatureError::InvalidSignature)?;
    let recovery_id = RecoveryId::from_byte(signature.0[SIGNATURE_SIZE - 1])
        .ok_or(SignatureError::InvalidSignature)?;

    let key = VerifyingKey::recover_from_prehash(&message.0, &compact, recovery_id)
        .map_err(|_| SignatureError::InvalidSignature)?;
    Ok(PublicKey::from_verifying_key(&key))
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.0))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash_bytes;

    #[test]
    fn test_key_generation() {
        let private = PrivateKey::generate();
        let public = private.public_key();
        assert!(public.0[0] == 0x02 || public.0[0] == 0x03);
        assert!(PublicKey::from_bytes(&public.0).is_ok());
    }

    #[test]
    fn test_sign_recover() {
        let private = PrivateKey::generate();
        let message = hash_bytes(b"test message");
        let signature = private.sign(&message).unwrap();

        let recovered = recover_public_key(&message, &signature).unwrap();
        assert_eq!(recovered, private.public_key());
        assert!(private.public_key().verify(&message, &signature));
    }

    #[test]
    fn test_wrong_key_fails() {
        let private1 = PrivateKey::generate();
        let private2 = PrivateKey::generate();

        let message = hash_bytes(b"test message");
        let signature = private1.sign(&message).unwrap();

        assert!(!private2.public_key().verify(&message, &signature));
    }

    #[test]
    fn test_wrong_message_recovers_other_key() {
        let private = PrivateKey::generate();
        let signature = private.sign(&hash_bytes(b"message 1")).unwrap();

        assert!(!private.public_key().verify(&hash_bytes(b"message 2"), &signature));
    }

    #[test]
    fn test_zero_signature_is_rejected() {
        let message = hash_bytes(b"message");
        let signature = Signature([0u8; SIGNATURE_SIZE]);
        assert!(recover_public_key(&message, &signature).is_err());
    }

    #[test]
    fn test_signature_hex_is_fixed_length() {
        let private = PrivateKey::generate();
        let signature = private.sign(&hash_bytes(b"hex")).unwrap();
        let hex = signature.to_hex();

        assert_eq!(hex.len(), SIGNATURE_SIZE * 2);
        assert_eq!(Signature::from_hex(&hex).unwrap(), signature);
        assert!(Signature::from_hex(&hex[..128]).is_err());
        assert!(Signature::from_hex(&hex.to_uppercase()).is_err());
    }

    #[test]
    fn test_key_serialization() {
        let private = PrivateKey::generate();
        let recovered = PrivateKey::from_bytes(&private.to_bytes()).unwrap();
        assert_eq!(private.public_key(), recovered.public_key());
    }
}
