//! Progress reporting for reconstruction sessions.
//!
//! Decouples the pipeline from output formatting; implementations can
//! print to a console, forward over a channel, or stay silent.

use super::types::RestoreReport;
use crate::metadata::FileMetadata;

/// Trait for observing a session's progress.
///
/// Finalize decodes chunks in parallel, so implementations must be
/// callable from multiple threads.
pub trait ProgressReporter: Send + Sync {
    /// The metadata chunk arrived and parsed.
    fn report_metadata(&self, metadata: &FileMetadata);

    /// A new data chunk was stored.
    fn report_chunk_stored(&self, index: u32, received: usize, expected: usize);

    /// Finalize started over the given chunk counts.
    fn report_finalize_start(&self, received: usize, expected: usize);

    /// A chunk's FEC decode failed and the uncorrected payload was used.
    fn report_chunk_fallback(&self, index: u32);

    /// Chunks were missing and their ranges left zero-filled.
    fn report_missing_chunks(&self, missing: usize);

    /// The end-to-end hash was checked.
    fn report_hash_check(&self, matched: bool);

    /// Reconstruction finished.
    fn report_complete(&self, report: &RestoreReport);
}

/// Console reporter for the CLI.
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl ProgressReporter for ConsoleReporter {
    fn report_metadata(&self, metadata: &FileMetadata) {
        if self.quiet {
            return;
        }
        println!(
            "Detected file: {} ({} data chunks, {} compressed bytes)",
            metadata.file_name,
            metadata.data_chunks(),
            metadata.compressed_size
        );
    }

    fn report_chunk_stored(&self, index: u32, received: usize, expected: usize) {
        if self.quiet {
            return;
        }
        if expected > 0 {
            println!("Chunk {index} stored ({received}/{expected})");
        } else {
            println!("Chunk {index} stored ({received} so far, metadata pending)");
        }
    }

    fn report_finalize_start(&self, received: usize, expected: usize) {
        if self.quiet {
            return;
        }
        println!("Reconstructing from {received} of {expected} data chunks...");
    }

    fn report_chunk_fallback(&self, index: u32) {
        if self.quiet {
            return;
        }
        println!("Chunk {index}: uncorrectable, using raw payload");
    }

    fn report_missing_chunks(&self, missing: usize) {
        if self.quiet {
            return;
        }
        println!("{missing} chunk(s) missing; their ranges stay zero-filled");
    }

    fn report_hash_check(&self, matched: bool) {
        if self.quiet {
            return;
        }
        if matched {
            println!("Integrity hash verified.");
        } else {
            println!("WARNING: integrity hash mismatch; recovered bytes may be corrupt.");
        }
    }

    fn report_complete(&self, report: &RestoreReport) {
        if self.quiet {
            return;
        }
        println!(
            "Recovered {} ({} bytes, {} of {} chunks, {} fallback)",
            report.file_name,
            report.bytes.len(),
            report.recovered_chunks,
            report.expected_chunks,
            report.fallback_chunks
        );
    }
}

/// Reporter that swallows everything. Default for library use.
#[derive(Default)]
pub struct SilentReporter;

impl SilentReporter {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressReporter for SilentReporter {
    fn report_metadata(&self, _metadata: &FileMetadata) {}
    fn report_chunk_stored(&self, _index: u32, _received: usize, _expected: usize) {}
    fn report_finalize_start(&self, _received: usize, _expected: usize) {}
    fn report_chunk_fallback(&self, _index: u32) {}
    fn report_missing_chunks(&self, _missing: usize) {}
    fn report_hash_check(&self, _matched: bool) {}
    fn report_complete(&self, _report: &RestoreReport) {}
}
