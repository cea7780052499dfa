//! Cryptography module - BLAKE3 hashing, recoverable ECDSA signatures, Merkle roots

mod hash;
mod signature;
mod merkle;

pub use hash::*;
pub use signature::*;
pub use merkle::*;
