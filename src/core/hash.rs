//! Session State Hashing
//!
//! SHA-256 digest over the logical session state. Two sessions that were
//! seeded alike and fed the same input script must hash alike, which is
//! what replay checks compare.

use sha2::{Sha256, Digest};

use super::coord::TileCoord;

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Incremental hasher for session state.
///
/// Order of updates is part of the hash.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for session state.
    pub fn for_session_state() -> Self {
        Self::new(b"ZOMBIE_HUNT_STATE_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an i32 value (little-endian).
    #[inline]
    pub fn update_i32(&mut self, value: i32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a board coordinate.
    #[inline]
    pub fn update_coord(&mut self, coord: TileCoord) {
        self.update_u8(coord.x() as u8);
        self.update_u8(coord.y() as u8);
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute a session state hash.
///
/// The update index and seed always lead; the closure appends the rest.
pub fn compute_state_hash<F>(update_index: u32, rng_seed: u64, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_session_state();

    hasher.update_u32(update_index);
    hasher.update_u64(rng_seed);

    add_state(&mut hasher);

    hasher.finalize()
}
