//! File metadata carried by the reserved index-0 chunk.
//!
//! The metadata payload is a JSON object with deliberately short keys
//! to save transport capacity. It describes the whole transfer and is
//! immutable for the lifetime of a session.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parsing or validating the metadata chunk.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid metadata: {0}")]
    Invalid(&'static str),
}

/// Description of the transferred file, parsed from chunk index 0.
///
/// `total_blocks` counts the metadata chunk itself, so a transfer with
/// N data chunks carries `tb = N + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Total chunk count, including this metadata chunk.
    #[serde(rename = "tb")]
    pub total_blocks: u32,

    /// Nominal payload size of one data chunk before FEC expansion.
    #[serde(rename = "b")]
    pub block_size: u32,

    /// Size of the full compressed stream in bytes.
    #[serde(rename = "c")]
    pub compressed_size: u64,

    /// Original file name.
    #[serde(rename = "n")]
    pub file_name: String,

    /// Original media type, if known.
    #[serde(rename = "t", default)]
    pub media_type: String,

    /// Original (decompressed) size in bytes.
    #[serde(rename = "s")]
    pub original_size: u64,

    /// BLAKE2b-256 digest of the decompressed bytes, hex-encoded.
    #[serde(rename = "h")]
    pub hash_hex: String,

    /// Whether each data chunk is encrypted.
    #[serde(rename = "e", default)]
    pub encrypted: bool,
}

impl FileMetadata {
    /// Parse and validate a metadata payload (the transport-decoded
    /// bytes of chunk 0).
    pub fn from_payload(payload: &[u8]) -> Result<Self, MetadataError> {
        let metadata: FileMetadata = serde_json::from_slice(payload)?;
        metadata.validate()?;
        Ok(metadata)
    }

    /// Serialise back into the wire payload.
    pub fn to_payload(&self) -> Vec<u8> {
        // FileMetadata always serialises: no maps, no non-string keys.
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Number of data chunks expected (excludes the metadata chunk).
    pub fn data_chunks(&self) -> usize {
        self.total_blocks.saturating_sub(1) as usize
    }

    fn validate(&self) -> Result<(), MetadataError> {
        if self.total_blocks < 2 {
            return Err(MetadataError::Invalid(
                "total block count must include at least one data chunk",
            ));
        }
        if self.block_size == 0 {
            return Err(MetadataError::Invalid("block size must be nonzero"));
        }
        if self.compressed_size == 0 {
            return Err(MetadataError::Invalid("compressed size must be nonzero"));
        }
        if self.file_name.is_empty() {
            return Err(MetadataError::Invalid("file name must not be empty"));
        }
        if self.hash_hex.is_empty() {
            return Err(MetadataError::Invalid("integrity hash must not be empty"));
        }
        Ok(())
    }
}
