//! Error types for reconstruction sessions.

use crate::codec::CodecError;
use crate::crypto::CryptoError;
use crate::envelope::EnvelopeError;
use crate::metadata::MetadataError;
use thiserror::Error;

/// Errors that can occur while ingesting chunks or finalizing.
///
/// `InvalidMetadata` and `DecryptionFailed` are fatal to the session;
/// a hash mismatch is deliberately *not* an error (see
/// [`RestoreReport::hash_matched`](super::RestoreReport)).
#[derive(Debug, Error)]
pub enum SessionError {
    /// The index-0 chunk was absent or failed to parse.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(#[from] MetadataError),

    /// Finalize was requested without force while chunks are missing.
    #[error("incomplete transfer: {received} of {expected} data chunks received")]
    IncompleteChunks { received: usize, expected: usize },

    /// Wrong password or corrupted authenticated ciphertext.
    #[error("decryption failed: {0}")]
    DecryptionFailed(#[from] CryptoError),

    /// The assembled stream did not decompress.
    #[error("decompression failed: {0}")]
    DecompressionFailed(String),

    /// A chunk failed FEC decoding under the strict recovery policy.
    #[error("chunk {index} could not be corrected: {source}")]
    Uncorrectable {
        index: u32,
        #[source]
        source: CodecError,
    },

    /// A chunk envelope could not be parsed.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    /// Finalize was cancelled through the session's cancel token.
    #[error("reconstruction cancelled")]
    Cancelled,
}

/// Type alias for Result with SessionError.
pub type Result<T> = std::result::Result<T, SessionError>;
