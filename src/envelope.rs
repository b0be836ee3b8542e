//! Chunk envelope: the JSON wrapper each transport code carries.
//!
//! One envelope is one scanned code: `{"v":"QSTv1","i":3,"d":"<base64>"}`.
//! `v` gates the format version, `i` is the chunk index (0 reserved for
//! metadata) and `d` is the base64 transport encoding of the chunk
//! payload. Envelopes may arrive in any order and any number of times.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire format version tag. Envelopes with any other tag are rejected.
pub const FORMAT_VERSION: &str = "QSTv1";

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("malformed envelope: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unsupported envelope version {found:?} (expected {expected:?})")]
    UnsupportedVersion { found: String, expected: &'static str },

    #[error("invalid transport encoding: {0}")]
    Transport(#[from] base64::DecodeError),
}

#[derive(Serialize, Deserialize)]
struct WireEnvelope {
    v: String,
    i: u32,
    d: String,
}

/// A decoded chunk: index plus raw payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkEnvelope {
    pub index: u32,
    pub payload: Vec<u8>,
}

impl ChunkEnvelope {
    /// Parse one envelope from its JSON text form.
    pub fn parse(text: &str) -> Result<Self, EnvelopeError> {
        let wire: WireEnvelope = serde_json::from_str(text)?;
        if wire.v != FORMAT_VERSION {
            return Err(EnvelopeError::UnsupportedVersion {
                found: wire.v,
                expected: FORMAT_VERSION,
            });
        }
        Ok(ChunkEnvelope {
            index: wire.i,
            payload: BASE64.decode(wire.d.as_bytes())?,
        })
    }

    /// Serialise a chunk into its JSON text form.
    pub fn to_json(index: u32, payload: &[u8]) -> String {
        let wire = WireEnvelope {
            v: FORMAT_VERSION.to_string(),
            i: index,
            d: BASE64.encode(payload),
        };
        // Plain struct of strings and an integer; serialisation cannot fail.
        serde_json::to_string(&wire).unwrap_or_default()
    }
}
