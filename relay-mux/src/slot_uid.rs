//! C8: Slot UID Tracker — a mutable-singleton-per-process correlation id,
//! modeled as an owned mutex-guarded record rather than ambient global
//! state (see design note in the project README on per-slot correlation).
use ethereum_consensus::primitives::Slot;
use parking_lot::Mutex;
use rand::RngCore;

#[derive(Clone, Copy, Debug, Default)]
struct Current {
    slot: Slot,
    uid: u128,
}

pub struct SlotUidTracker {
    current: Mutex<Current>,
}

impl Default for SlotUidTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotUidTracker {
    pub fn new() -> Self {
        Self { current: Mutex::new(Current::default()) }
    }

    /// Returns the uid to stamp on every upstream call for `slot`. Advances
    /// the tracked slot and mints a fresh uid when `slot` is newer; reuses
    /// the existing uid when `slot` repeats; leaves state untouched and logs
    /// a warning for a stale (older) slot.
    pub fn uid_for_slot(&self, slot: Slot) -> u128 {
        let mut current = self.current.lock();
        if slot > current.slot || (current.slot == 0 && current.uid == 0) {
            let mut bytes = [0u8; 16];
            rand::thread_rng().fill_bytes(&mut bytes);
            current.slot = slot;
            current.uid = u128::from_be_bytes(bytes);
        } else if slot < current.slot {
            tracing::warn!(requested = slot, tracked = current.slot, "stale slot UID request; duty arrived out of order");
        }
        current.uid
    }
}

pub fn format_uid(uid: u128) -> String {
    format!("{uid:032x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_uid_on_newer_slot() {
        let tracker = SlotUidTracker::new();
        let first = tracker.uid_for_slot(10);
        let second = tracker.uid_for_slot(11);
        assert_ne!(first, second);
    }

    #[test]
    fn reuses_uid_for_repeated_slot() {
        let tracker = SlotUidTracker::new();
        let first = tracker.uid_for_slot(10);
        let second = tracker.uid_for_slot(10);
        assert_eq!(first, second);
    }

    #[test]
    fn ignores_stale_slot() {
        let tracker = SlotUidTracker::new();
        let latest = tracker.uid_for_slot(10);
        let stale = tracker.uid_for_slot(5);
        assert_eq!(latest, stale);
    }
}
