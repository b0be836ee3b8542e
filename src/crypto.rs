//! Password-based chunk encryption.
//!
//! Each encrypted chunk is laid out as salt ‖ nonce ‖ ciphertext+tag.
//! The key is derived per chunk with Argon2id over the chunk's own
//! salt, then the body is sealed with AES-256-GCM. Key derivation and
//! AEAD parameters are fixed constants shared by producer and consumer.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

/// Salt length prefixed to every encrypted chunk.
pub const SALT_LEN: usize = 16;
/// AES-GCM nonce length.
pub const NONCE_LEN: usize = 12;
/// AES-GCM authentication tag length (appended to the ciphertext).
pub const TAG_LEN: usize = 16;

/// Derived key length (AES-256).
const KEY_LEN: usize = 32;

// Argon2id cost parameters. Changing these breaks every existing
// transfer, so they are not configurable.
const ARGON2_M_COST_KIB: u32 = 102_400;
const ARGON2_T_COST: u32 = 2;
const ARGON2_P_COST: u32 = 4;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("password required for encrypted data")]
    PasswordRequired,

    #[error("encrypted chunk too short: {len} bytes, need at least {min}")]
    TooShort { len: usize, min: usize },

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("authentication failed (wrong password or corrupted chunk)")]
    AuthFailed,
}

fn derive_key(password: &str, salt: &[u8]) -> Result<[u8; KEY_LEN], CryptoError> {
    let params = Params::new(ARGON2_M_COST_KIB, ARGON2_T_COST, ARGON2_P_COST, Some(KEY_LEN))
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    Ok(key)
}

/// Seal a chunk payload under a password.
pub fn encrypt(plaintext: &[u8], password: &str) -> Result<Vec<u8>, CryptoError> {
    let mut salt = [0u8; SALT_LEN];
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut nonce);

    let key = derive_key(password, &salt)?;
    let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| CryptoError::AuthFailed)?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| CryptoError::AuthFailed)?;

    let mut blob = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Open a sealed chunk. Fails with [`CryptoError::AuthFailed`] on a
/// wrong password or any tampering with the ciphertext.
pub fn decrypt(blob: &[u8], password: &str) -> Result<Vec<u8>, CryptoError> {
    let min = SALT_LEN + NONCE_LEN + TAG_LEN;
    if blob.len() < min {
        return Err(CryptoError::TooShort {
            len: blob.len(),
            min,
        });
    }

    let (salt, rest) = blob.split_at(SALT_LEN);
    let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

    let key = derive_key(password, salt)?;
    let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| CryptoError::AuthFailed)?;
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::AuthFailed)
}
