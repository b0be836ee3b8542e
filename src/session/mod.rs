//! Reconstruction session: collect chunks, then rebuild the file.
//!
//! A session accumulates transport chunks in any order, keyed by index.
//! Chunk 0 carries the transfer metadata; every other chunk is an
//! FEC-protected (and optionally encrypted) slice of the compressed
//! stream. Finalize consumes the session and drives, per chunk,
//! decrypt → FEC-correct → positional placement, then decompresses the
//! assembled stream and checks the end-to-end hash.
//!
//! Sessions are plain values: create as many as there are concurrent
//! transfers, and create a fresh one to retry after a failure.

mod background;
mod builder;
mod error;
mod progress;
mod types;

pub use background::{spawn_finalize, FinalizeEvent};
pub use builder::SessionBuilder;
pub use error::{Result, SessionError};
pub use progress::{ConsoleReporter, ProgressReporter, SilentReporter};
pub use types::{CancelToken, IngestOutcome, RecoveryPolicy, RestoreReport, SessionState};

use crate::codec::RsCodec;
use crate::crypto::{self, CryptoError};
use crate::envelope::ChunkEnvelope;
use crate::hashing;
use crate::metadata::FileMetadata;
use log::{debug, warn};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::io::Read;

/// One corrected chunk waiting to be placed into the assembly buffer.
struct ChunkPlacement {
    index: u32,
    bytes: Vec<u8>,
    fell_back: bool,
}

/// Stateful reassembly of one file transfer.
pub struct ReconstructSession {
    metadata: Option<FileMetadata>,
    chunks: FxHashMap<u32, Vec<u8>>,
    policy: RecoveryPolicy,
    password: Option<String>,
    fec_len: usize,
    cancel: CancelToken,
    reporter: Box<dyn ProgressReporter>,
}

impl ReconstructSession {
    /// Session with default configuration (see [`SessionBuilder`]).
    pub fn new() -> Self {
        SessionBuilder::new().build()
    }

    pub(crate) fn from_parts(
        policy: RecoveryPolicy,
        password: Option<String>,
        fec_len: usize,
        cancel: CancelToken,
        reporter: Box<dyn ProgressReporter>,
    ) -> Self {
        Self {
            metadata: None,
            chunks: FxHashMap::default(),
            policy,
            password,
            fec_len,
            cancel,
            reporter,
        }
    }

    pub(crate) fn set_reporter(&mut self, reporter: Box<dyn ProgressReporter>) {
        self.reporter = reporter;
    }

    /// Ingest one raw chunk. Idempotent by index: re-ingesting a seen
    /// index is a no-op, even with a different payload.
    pub fn ingest(&mut self, index: u32, payload: Vec<u8>) -> Result<IngestOutcome> {
        if index == 0 {
            if self.metadata.is_some() {
                debug!("metadata chunk re-received; ignoring");
                return Ok(IngestOutcome::Duplicate);
            }
            let metadata = FileMetadata::from_payload(&payload)?;
            self.reporter.report_metadata(&metadata);
            debug!(
                "metadata: {} data chunks of {} bytes, {} compressed",
                metadata.data_chunks(),
                metadata.block_size,
                metadata.compressed_size
            );
            // Chunks held before the metadata arrived were stored
            // unchecked; drop any whose index the metadata disowns so
            // they cannot count toward completion.
            let held = self.chunks.len();
            self.chunks
                .retain(|&index, _| index < metadata.total_blocks);
            let dropped = held - self.chunks.len();
            if dropped > 0 {
                warn!(
                    "dropped {dropped} chunk(s) with indices beyond the declared total of {}",
                    metadata.total_blocks
                );
            }
            self.metadata = Some(metadata);
            return Ok(IngestOutcome::Metadata);
        }

        if let Some(metadata) = &self.metadata {
            if index >= metadata.total_blocks {
                warn!(
                    "chunk index {index} out of range (total {}); ignoring",
                    metadata.total_blocks
                );
                return Ok(IngestOutcome::OutOfRange);
            }
        }

        if self.chunks.contains_key(&index) {
            debug!("chunk {index} already stored; first write wins");
            return Ok(IngestOutcome::Duplicate);
        }
        self.chunks.insert(index, payload);

        let received = self.chunks.len();
        let expected = self.expected_chunks().unwrap_or(0);
        self.reporter.report_chunk_stored(index, received, expected);
        Ok(IngestOutcome::Stored { received })
    }

    /// Parse a JSON envelope and ingest its chunk.
    pub fn ingest_envelope(&mut self, text: &str) -> Result<IngestOutcome> {
        let envelope = ChunkEnvelope::parse(text)?;
        self.ingest(envelope.index, envelope.payload)
    }

    pub fn state(&self) -> SessionState {
        match (&self.metadata, self.expected_chunks()) {
            (None, _) => SessionState::AwaitingMetadata,
            (Some(_), Some(expected)) if self.chunks.len() >= expected => SessionState::Ready,
            (Some(_), _) => SessionState::Collecting,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == SessionState::Ready
    }

    /// Distinct data chunks ingested so far.
    pub fn received_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Data chunks promised by the metadata, once known.
    pub fn expected_chunks(&self) -> Option<usize> {
        self.metadata.as_ref().map(FileMetadata::data_chunks)
    }

    pub fn metadata(&self) -> Option<&FileMetadata> {
        self.metadata.as_ref()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Rebuild the file from the collected chunks, consuming the
    /// session. Refuses with [`SessionError::IncompleteChunks`] while
    /// chunks are missing.
    pub fn finalize(self) -> Result<RestoreReport> {
        self.run_finalize(false)
    }

    /// Rebuild even with chunks missing: their byte ranges stay
    /// zero-filled, which usually surfaces downstream as a
    /// decompression failure or a hash mismatch warning.
    pub fn finalize_forced(self) -> Result<RestoreReport> {
        self.run_finalize(true)
    }

    fn run_finalize(self, force: bool) -> Result<RestoreReport> {
        let ReconstructSession {
            metadata,
            chunks,
            policy,
            password,
            fec_len,
            cancel,
            reporter,
        } = self;

        let metadata = metadata.ok_or(SessionError::InvalidMetadata(
            crate::metadata::MetadataError::Invalid("metadata chunk (index 0) never received"),
        ))?;

        let expected = metadata.data_chunks();
        let received = chunks.len();
        if !force && received < expected {
            return Err(SessionError::IncompleteChunks { received, expected });
        }
        reporter.report_finalize_start(received, expected);

        let missing = expected.saturating_sub(received);
        if missing > 0 {
            warn!("forcing finalize with {missing} chunk(s) missing");
            reporter.report_missing_chunks(missing);
        }

        let mut entries: Vec<(u32, Vec<u8>)> = chunks.into_iter().collect();
        entries.sort_unstable_by_key(|(index, _)| *index);

        // Chunks are independent: decrypt and correct them in parallel,
        // then place serially (offsets are disjoint by construction).
        let codec = RsCodec::new(fec_len);
        let reporter_ref: &dyn ProgressReporter = &*reporter;
        let placements: Vec<ChunkPlacement> = entries
            .into_par_iter()
            .map(|(index, payload)| {
                if cancel.is_cancelled() {
                    return Err(SessionError::Cancelled);
                }
                recover_chunk(
                    index,
                    payload,
                    &metadata,
                    password.as_deref(),
                    &codec,
                    policy,
                    reporter_ref,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let mut assembly = vec![0u8; metadata.compressed_size as usize];
        let block_size = metadata.block_size as usize;
        let mut fallback_chunks = 0;
        for placement in &placements {
            if placement.fell_back {
                fallback_chunks += 1;
            }
            let start = (placement.index as usize - 1) * block_size;
            if start >= assembly.len() {
                warn!(
                    "chunk {} starts beyond the declared compressed size; skipping",
                    placement.index
                );
                continue;
            }
            let end = (start + placement.bytes.len()).min(assembly.len());
            assembly[start..end].copy_from_slice(&placement.bytes[..end - start]);
        }

        if cancel.is_cancelled() {
            return Err(SessionError::Cancelled);
        }

        let mut decompressed = Vec::with_capacity(metadata.original_size as usize);
        flate2::read::ZlibDecoder::new(assembly.as_slice())
            .read_to_end(&mut decompressed)
            .map_err(|e| SessionError::DecompressionFailed(e.to_string()))?;

        let computed_hash = hashing::blake2b256_hex(&decompressed);
        let hash_matched = computed_hash.eq_ignore_ascii_case(&metadata.hash_hex);
        if !hash_matched {
            warn!(
                "integrity hash mismatch: expected {}, computed {computed_hash}",
                metadata.hash_hex
            );
        }
        reporter.report_hash_check(hash_matched);

        let report = RestoreReport {
            file_name: metadata.file_name,
            media_type: metadata.media_type,
            declared_size: metadata.original_size,
            bytes: decompressed,
            computed_hash,
            hash_matched,
            recovered_chunks: received.min(expected),
            expected_chunks: expected,
            missing_chunks: missing,
            fallback_chunks,
        };
        reporter.report_complete(&report);
        Ok(report)
    }
}

impl Default for ReconstructSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Decrypt and FEC-correct one chunk.
fn recover_chunk(
    index: u32,
    payload: Vec<u8>,
    metadata: &FileMetadata,
    password: Option<&str>,
    codec: &RsCodec,
    policy: RecoveryPolicy,
    reporter: &dyn ProgressReporter,
) -> Result<ChunkPlacement> {
    let plain = if metadata.encrypted {
        let password = password.ok_or(SessionError::DecryptionFailed(
            CryptoError::PasswordRequired,
        ))?;
        crypto::decrypt(&payload, password)?
    } else {
        payload
    };

    match codec.decode(&plain) {
        Ok(bytes) => Ok(ChunkPlacement {
            index,
            bytes,
            fell_back: false,
        }),
        Err(source) => match policy {
            RecoveryPolicy::Strict => Err(SessionError::Uncorrectable { index, source }),
            RecoveryPolicy::BestEffort => {
                warn!("chunk {index}: {source}; using uncorrected payload");
                reporter.report_chunk_fallback(index);
                let cut = plain.len().saturating_sub(codec.fec_len());
                Ok(ChunkPlacement {
                    index,
                    bytes: plain[..cut].to_vec(),
                    fell_back: true,
                })
            }
        },
    }
}
