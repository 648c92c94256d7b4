//! Run snapshots with integrity verification
//!
//! Features:
//! - Versioned JSON envelope
//! - SHA-256 integrity digest over the payload
//! - Atomic file writes (tmp → rename)
//!
//! A snapshot taken at a frame boundary resumes bit-for-bit: both generators
//! travel with the state. Cosmetic particles and undrained events do not.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::sim::RunState;

/// Bumped whenever `RunState`'s shape changes. Older snapshots are refused.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors that can occur while sealing or opening a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported snapshot version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },

    #[error("snapshot digest mismatch")]
    Digest,
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    digest: String,
    payload: String,
}

fn hex_digest(data: &[u8]) -> String {
    Sha256::digest(data)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Encode a run into a sealed envelope.
pub fn seal(state: &RunState) -> Result<String, SnapshotError> {
    let payload = serde_json::to_string(state)?;
    let envelope = Envelope {
        version: SNAPSHOT_VERSION,
        digest: hex_digest(payload.as_bytes()),
        payload,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Verify and decode a sealed envelope.
pub fn open(sealed: &str) -> Result<RunState, SnapshotError> {
    let envelope: Envelope = serde_json::from_str(sealed)?;
    if envelope.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::Version {
            found: envelope.version,
            expected: SNAPSHOT_VERSION,
        });
    }
    if hex_digest(envelope.payload.as_bytes()) != envelope.digest {
        return Err(SnapshotError::Digest);
    }
    Ok(serde_json::from_str(&envelope.payload)?)
}

/// Seal a run to disk atomically.
pub fn write_snapshot(path: &Path, state: &RunState) -> Result<(), SnapshotError> {
    let sealed = seal(state)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, sealed)?;
    fs::rename(&tmp, path)?;
    log::debug!("Snapshot written to {}", path.display());
    Ok(())
}

/// Load and verify a run from disk.
pub fn read_snapshot(path: &Path) -> Result<RunState, SnapshotError> {
    open(&fs::read_to_string(path)?)
}
