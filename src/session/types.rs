//! Data types for reconstruction sessions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Where a session is in its lifecycle. `Finalizing`, `Done` and
/// `Failed` are implicit in the consuming finalize call: a session
/// value no longer exists once finalize has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The metadata chunk (index 0) has not arrived yet. Data chunks
    /// are still accepted and held.
    AwaitingMetadata,
    /// Metadata known, data chunks still missing.
    Collecting,
    /// Every expected data chunk has been ingested.
    Ready,
}

/// What to do when a chunk's FEC decode fails.
///
/// A session-level choice, never mixed per chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryPolicy {
    /// Fall back to the uncorrected payload and keep going; the report
    /// counts how many chunks degraded. Favors availability.
    #[default]
    BestEffort,
    /// Abort the whole reconstruction on the first failed chunk.
    Strict,
}

/// Result of ingesting one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Index 0 arrived and the metadata was parsed.
    Metadata,
    /// A new data chunk was stored.
    Stored { received: usize },
    /// The index was already seen; nothing changed (first write wins).
    Duplicate,
    /// The index lies beyond the declared chunk count; ignored.
    OutOfRange,
}

/// Outcome of a completed reconstruction.
///
/// Delivered even when the integrity hash does not match; the mismatch
/// is a warning, not a failure.
#[derive(Debug)]
pub struct RestoreReport {
    pub file_name: String,
    pub media_type: String,
    /// Original size as declared by the metadata.
    pub declared_size: u64,
    /// The recovered (decompressed) bytes.
    pub bytes: Vec<u8>,
    /// BLAKE2b-256 of `bytes`, hex-encoded.
    pub computed_hash: String,
    /// Whether `computed_hash` matches the metadata's recorded hash.
    pub hash_matched: bool,
    /// Data chunks that were present at finalize.
    pub recovered_chunks: usize,
    /// Data chunks the metadata promised.
    pub expected_chunks: usize,
    /// Chunks whose byte ranges stayed zero-filled (forced finalize).
    pub missing_chunks: usize,
    /// Chunks that fell back to their uncorrected payload.
    pub fallback_chunks: usize,
}

impl RestoreReport {
    /// True when the transfer was complete and the hash verified.
    pub fn is_intact(&self) -> bool {
        self.hash_matched && self.missing_chunks == 0
    }
}

/// Cooperative cancellation handle for finalize.
///
/// Cloneable; cancelling any clone aborts pending per-chunk work with
/// no side effects on external state.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
