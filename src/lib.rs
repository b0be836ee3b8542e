//! qrstitch reassembles a file that was split into many small,
//! independently-transmitted chunks (the kind carried by a stream of
//! QR codes), each protected by Reed-Solomon parity over GF(2^8) and
//! optionally encrypted. Chunks may arrive in any order, duplicated,
//! or locally corrupted; missing chunks can be tolerated on request.
//!
//! The building blocks, bottom up: [`galois`] and [`gf_poly`] provide
//! the field arithmetic, [`codec`] the per-chunk error correction,
//! [`session`] the stateful reassembly pipeline, and [`pack`] the
//! matching producer side.

pub mod codec;
pub mod crypto;
pub mod envelope;
pub mod galois;
pub mod gf_poly;
pub mod hashing;
pub mod metadata;
pub mod pack;
pub mod session;

pub mod args;

pub use codec::{CodecError, RsCodec, DEFAULT_FEC_LEN};
pub use envelope::{ChunkEnvelope, FORMAT_VERSION};
pub use galois::Gf256;
pub use metadata::FileMetadata;
pub use pack::{pack as pack_file, PackOptions, PackedFile};
pub use session::{
    CancelToken, IngestOutcome, ReconstructSession, RecoveryPolicy, RestoreReport, SessionBuilder,
    SessionError, SessionState,
};
