//! Producer side: turn a file into a stream of chunk envelopes.
//!
//! Pipeline: compress (zlib) → split into fixed-size blocks → append
//! FEC parity per block → optionally encrypt per block → base64 into
//! the JSON envelope. Chunk 0 carries the metadata describing the
//! whole transfer; data chunks are numbered from 1 in stream order,
//! although consumers accept them in any order.

use crate::codec::{RsCodec, DEFAULT_FEC_LEN, MAX_CODEWORD_LEN};
use crate::crypto::{self, CryptoError};
use crate::envelope::ChunkEnvelope;
use crate::hashing;
use crate::metadata::FileMetadata;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::debug;
use std::io::Write;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    #[error(
        "block size {block_size} plus {fec_len} parity symbols exceeds the \
         codeword limit of {MAX_CODEWORD_LEN}"
    )]
    BlockTooLarge { block_size: usize, fec_len: usize },

    #[error("block size must be nonzero")]
    ZeroBlockSize,

    #[error("compression failed: {0}")]
    Compression(#[from] std::io::Error),

    #[error("encryption failed: {0}")]
    Crypto(#[from] CryptoError),
}

/// Knobs for the packing pipeline.
pub struct PackOptions {
    /// Payload bytes per data chunk before FEC expansion.
    pub block_size: usize,
    /// Parity symbols appended to each block.
    pub fec_len: usize,
    /// Encrypt every data chunk under this password when set.
    pub password: Option<String>,
    /// Media type recorded in the metadata.
    pub media_type: String,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            // Fills a 255-symbol codeword with the default parity count.
            block_size: MAX_CODEWORD_LEN - DEFAULT_FEC_LEN,
            fec_len: DEFAULT_FEC_LEN,
            password: None,
            media_type: String::new(),
        }
    }
}

/// A packed transfer: the metadata plus one envelope per chunk,
/// envelope 0 being the metadata chunk.
pub struct PackedFile {
    pub metadata: FileMetadata,
    pub envelopes: Vec<String>,
}

/// Pack a file's bytes into chunk envelopes.
pub fn pack(file_name: &str, data: &[u8], options: &PackOptions) -> Result<PackedFile, PackError> {
    if options.block_size == 0 {
        return Err(PackError::ZeroBlockSize);
    }
    if options.block_size + options.fec_len > MAX_CODEWORD_LEN {
        return Err(PackError::BlockTooLarge {
            block_size: options.block_size,
            fec_len: options.fec_len,
        });
    }

    let hash_hex = hashing::blake2b256_hex(data);

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    let compressed = encoder.finish()?;

    let blocks: Vec<&[u8]> = compressed.chunks(options.block_size).collect();
    let metadata = FileMetadata {
        total_blocks: blocks.len() as u32 + 1,
        block_size: options.block_size as u32,
        compressed_size: compressed.len() as u64,
        file_name: file_name.to_string(),
        media_type: options.media_type.clone(),
        original_size: data.len() as u64,
        hash_hex,
        encrypted: options.password.is_some(),
    };
    debug!(
        "packing {}: {} bytes -> {} compressed -> {} data chunks",
        file_name,
        data.len(),
        compressed.len(),
        blocks.len()
    );

    let codec = RsCodec::new(options.fec_len);
    let mut envelopes = Vec::with_capacity(blocks.len() + 1);
    envelopes.push(ChunkEnvelope::to_json(0, &metadata.to_payload()));

    for (i, block) in blocks.iter().enumerate() {
        let codeword = codec.encode(block);
        let payload = match &options.password {
            Some(password) => crypto::encrypt(&codeword, password)?,
            None => codeword,
        };
        envelopes.push(ChunkEnvelope::to_json(i as u32 + 1, &payload));
    }

    Ok(PackedFile {
        metadata,
        envelopes,
    })
}
