//! ROHO (RH) Visor
//!
//! Readable (JSON) forms of RH ledger entities and the validating
//! transaction JSON codec, on top of a small in-memory UTXO ledger.
//!
//! RH is the short form used in addresses, logos, and protocol identifiers.

pub mod consensus;
pub mod crypto;
pub mod validation;
pub mod storage;
pub mod wallet;
pub mod node;
pub mod visor;

/// Protocol constants - HARD-CODED, NEVER CONFIGURABLE
pub mod constants {
    /// Size of a BLAKE3 hash in bytes
    pub const HASH_SIZE: usize = 32;

    /// Size of a recoverable signature (64-byte compact ECDSA + recovery id)
    pub const SIGNATURE_SIZE: usize = 65;

    /// Size of the address key (truncated BLAKE3 of the compressed pubkey)
    pub const ADDRESS_KEY_SIZE: usize = 20;

    /// Size of the address checksum
    pub const ADDRESS_CHECKSUM_SIZE: usize = 4;

    /// Prefix of every textual address
    pub const ADDRESS_PREFIX: &str = "RH";

    /// The only transaction type currently defined
    pub const DEFAULT_TRANSACTION_TYPE: u8 = 0;

    /// Block version used for genesis and new blocks
    pub const BLOCK_VERSION: u32 = 1;
}
