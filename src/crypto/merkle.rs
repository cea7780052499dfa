//! Merkle tree implementation
//!
//! Used for computing the body hash of a block from its transaction hashes.

use super::{Hash, hash_pair};

/// Compute the merkle root of a list of hashes
///
/// If the list is empty, returns zero hash.
/// If odd number of elements, duplicates the last element, so `[a, b, c]`
/// and `[a, b, c, c]` share a root. Block bodies never repeat a transaction:
/// a repeat spends the same inputs twice and `ChainState::validate_block`
/// rejects it as a double spend.
pub fn compute_merkle_root(hashes: &[Hash]) -> Hash {
    let mut current_level: Vec<Hash> = hashes.to_vec();

    if current_level.is_empty() {
        return Hash::zero();
    }

    while current_level.len() > 1 {
        // If odd number, duplicate last
        if current_level.len() % 2 == 1 {
            let last = current_level[current_level.len() - 1];
            current_level.push(last);
        }

        current_level = current_level
            .chunks(2)
            .map(|pair| hash_pair(&pair[0], &pair[1]))
            .collect();
    }

    current_level[0]
}
