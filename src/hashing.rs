//! End-to-end integrity hashing (BLAKE2b-256).

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// Hex-encoded BLAKE2b-256 digest, as recorded in the metadata chunk.
pub fn blake2b256_hex(data: &[u8]) -> String {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
