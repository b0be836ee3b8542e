//! Off-main-thread finalize.
//!
//! The core pipeline is synchronous; hosts that must not block (UI
//! threads, event loops) run it through [`spawn_finalize`], which moves
//! the session to a worker thread and streams progress and the final
//! result over a channel. Cancellation goes through the session's
//! [`CancelToken`](super::CancelToken).

use super::progress::ProgressReporter;
use super::types::RestoreReport;
use super::{ReconstructSession, SessionError};
use crate::metadata::FileMetadata;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};

/// Events emitted while a background finalize runs. `Finished` is
/// always the last event.
#[derive(Debug)]
pub enum FinalizeEvent {
    Started { received: usize, expected: usize },
    ChunkFallback { index: u32 },
    MissingChunks { missing: usize },
    HashChecked { matched: bool },
    Finished(std::result::Result<RestoreReport, SessionError>),
}

/// Reporter that forwards progress into the event channel.
struct ChannelReporter {
    // Sender is single-consumer plumbing; the mutex makes it usable
    // from rayon's worker threads.
    tx: Mutex<Sender<FinalizeEvent>>,
}

impl ChannelReporter {
    fn send(&self, event: FinalizeEvent) {
        if let Ok(tx) = self.tx.lock() {
            // A dropped receiver just means nobody is listening.
            let _ = tx.send(event);
        }
    }
}

impl ProgressReporter for ChannelReporter {
    fn report_metadata(&self, _metadata: &FileMetadata) {}

    fn report_chunk_stored(&self, _index: u32, _received: usize, _expected: usize) {}

    fn report_finalize_start(&self, received: usize, expected: usize) {
        self.send(FinalizeEvent::Started { received, expected });
    }

    fn report_chunk_fallback(&self, index: u32) {
        self.send(FinalizeEvent::ChunkFallback { index });
    }

    fn report_missing_chunks(&self, missing: usize) {
        self.send(FinalizeEvent::MissingChunks { missing });
    }

    fn report_hash_check(&self, matched: bool) {
        self.send(FinalizeEvent::HashChecked { matched });
    }

    fn report_complete(&self, _report: &RestoreReport) {}
}

/// Run finalize on a worker thread.
///
/// Replaces the session's reporter with a channel bridge; any reporter
/// configured earlier is not invoked during the background run.
pub fn spawn_finalize(
    mut session: ReconstructSession,
    force: bool,
) -> (JoinHandle<()>, Receiver<FinalizeEvent>) {
    let (tx, rx) = channel();
    session.set_reporter(Box::new(ChannelReporter {
        tx: Mutex::new(tx.clone()),
    }));

    let handle = thread::spawn(move || {
        let result = if force {
            session.finalize_forced()
        } else {
            session.finalize()
        };
        let _ = tx.send(FinalizeEvent::Finished(result));
    });

    (handle, rx)
}
