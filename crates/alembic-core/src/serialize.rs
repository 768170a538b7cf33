//! Snapshots and state hashing for [`GameState`].
//!
//! Snapshots are `bitcode` blobs behind a versioned header. Fill state is
//! derived data, so it is never written; restoring re-solves the board.

use serde::{Deserialize, Serialize};

use crate::brew::Sink;
use crate::config::{ConfigError, GameConfig};
use crate::grid::{GridError, PipeGrid};
use crate::rng::SimRng;
use crate::source::Source;
use crate::state::GameState;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying a game snapshot.
pub const SNAPSHOT_MAGIC: u32 = 0xA1E8_0001;

/// Current format version. Increment when breaking the wire format.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RestoreError {
    #[error("data too short for snapshot header")]
    TooShort,
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", SNAPSHOT_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("unsupported format version: expected {}, got {}", FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("snapshot from future version {0} (this build supports up to {FORMAT_VERSION})")]
    FutureVersion(u32),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
    #[error("snapshot grid is malformed: {0}")]
    InvalidGrid(GridError),
    #[error("snapshot tuning is invalid: {0}")]
    InvalidConfig(ConfigError),
    #[error("snapshot has {len} {what} for a {dim}-wide board")]
    SizeMismatch {
        what: &'static str,
        len: usize,
        dim: usize,
    },
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Fixed-size header in front of every snapshot: magic, version, and turn,
/// each a little-endian u32. Readable without decoding the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub magic: u32,
    pub version: u32,
    /// Turn counter at the time the snapshot was taken.
    pub turn: u32,
}

impl SnapshotHeader {
    pub const LEN: usize = 12;

    pub fn new(turn: u32) -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION,
            turn,
        }
    }

    pub fn validate(&self) -> Result<(), RestoreError> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(RestoreError::InvalidMagic(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(RestoreError::FutureVersion(self.version));
        }
        if self.version < FORMAT_VERSION {
            return Err(RestoreError::UnsupportedVersion(self.version));
        }
        Ok(())
    }

    fn to_bytes(self) -> [u8; Self::LEN] {
        let mut out = [0; Self::LEN];
        out[0..4].copy_from_slice(&self.magic.to_le_bytes());
        out[4..8].copy_from_slice(&self.version.to_le_bytes());
        out[8..12].copy_from_slice(&self.turn.to_le_bytes());
        out
    }

    /// Read the header from the front of `data`.
    pub fn read(data: &[u8]) -> Result<Self, RestoreError> {
        let word = |i: usize| -> Result<u32, RestoreError> {
            data.get(i..i + 4)
                .and_then(|b| b.try_into().ok())
                .map(u32::from_le_bytes)
                .ok_or(RestoreError::TooShort)
        };
        Ok(Self {
            magic: word(0)?,
            version: word(4)?,
            turn: word(8)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
struct StateSnapshot {
    config: GameConfig,
    grid: PipeGrid,
    sources: Vec<Option<Source>>,
    sinks: Vec<Sink>,
    rng: SimRng,
    mulligans: u32,
    turns: u32,
}

impl StateSnapshot {
    /// Reject payloads that decode cleanly but could not have been written
    /// by [`GameState::snapshot`].
    fn validate(&self) -> Result<(), RestoreError> {
        self.grid.validate().map_err(RestoreError::InvalidGrid)?;
        self.config.validate().map_err(RestoreError::InvalidConfig)?;
        let dim = self.grid.dim();
        for (what, len) in [
            ("config columns", self.config.dim),
            ("sources", self.sources.len()),
            ("sinks", self.sinks.len()),
        ] {
            if len != dim {
                return Err(RestoreError::SizeMismatch { what, len, dim });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// StateHash
// ---------------------------------------------------------------------------

/// FNV-1a (64-bit) accumulator. Not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(pub u64);

impl StateHash {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self(Self::FNV_OFFSET)
    }

    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::FNV_PRIME);
        }
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_u8(&mut self, v: u8) {
        self.write(&[v]);
    }

    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// GameState methods
// ---------------------------------------------------------------------------

impl GameState {
    /// Encode everything needed to resume this game.
    pub fn snapshot(&self) -> Result<Vec<u8>, SnapshotError> {
        let payload = StateSnapshot {
            config: self.config.clone(),
            grid: self.grid.clone(),
            sources: self.sources.clone(),
            sinks: self.sinks.clone(),
            rng: self.rng.clone(),
            mulligans: self.mulligans,
            turns: self.turns,
        };
        let body =
            bitcode::serialize(&payload).map_err(|e| SnapshotError::Encode(e.to_string()))?;

        let mut out = Vec::with_capacity(SnapshotHeader::LEN + body.len());
        out.extend_from_slice(&SnapshotHeader::new(self.turns).to_bytes());
        out.extend_from_slice(&body);
        log::debug!("snapshot at turn {}: {} bytes", self.turns, out.len());
        Ok(out)
    }

    /// Decode a snapshot and re-solve its board.
    ///
    /// The header is checked before the payload is touched, so a snapshot
    /// from another version fails with a version error rather than a decode
    /// error. A payload that decodes but is inconsistent (tile count, board
    /// width, tuning) is rejected before anything is solved.
    pub fn restore(data: &[u8]) -> Result<Self, RestoreError> {
        SnapshotHeader::read(data)?.validate()?;
        let payload: StateSnapshot = bitcode::deserialize(&data[SnapshotHeader::LEN..])
            .map_err(|e| RestoreError::Decode(e.to_string()))?;
        payload.validate()?;

        let mut state = GameState {
            config: payload.config,
            grid: payload.grid,
            sources: payload.sources,
            sinks: payload.sinks,
            rng: payload.rng,
            mulligans: payload.mulligans,
            turns: payload.turns,
            flow: Default::default(),
            solver: Default::default(),
        };
        state.solve();
        Ok(state)
    }

    /// Hash of the persistent state. Two games that took the same inputs
    /// from the same seed hash equal.
    pub fn state_hash(&self) -> u64 {
        let mut h = StateHash::new();
        h.write_u64(self.grid.dim() as u64);
        for (_, tile) in self.grid.tiles() {
            h.write_u8(tile.shape as u8);
            h.write_u8(tile.rotation.quarter_turns());
        }
        for source in &self.sources {
            match source {
                Some(s) => {
                    h.write_u8(1);
                    h.write_u8(s.color.index());
                    h.write_u32(s.count);
                }
                None => h.write_u8(0),
            }
        }
        for sink in &self.sinks {
            for v in sink.potency.0 {
                h.write_u32(v);
            }
        }
        h.write_u64(self.rng.state());
        h.write_u32(self.mulligans);
        h.write_u32(self.turns);
        h.finish()
    }
}
