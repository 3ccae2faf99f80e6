//! C6: Bid Cache — a mutex-guarded map from `(slot, blockHash)` to the
//! remembered auction outcome, swept on a timer. Advisory only: losing an
//! entry (e.g. across a restart) must never brick an in-flight duty
//! (§9 design note), so readers treat a miss as "proceed anyway".
use builder_api::types::SignedBuilderBid;
use ethereum_consensus::primitives::{Hash32, Slot};
use parking_lot::Mutex;
use std::{collections::HashMap, time::{Duration, Instant}};

const ENTRY_TTL: Duration = Duration::from_secs(3 * 60);
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct CacheKey {
    slot: Slot,
    block_hash: Hash32,
}

impl CacheKey {
    pub fn new(slot: Slot, block_hash: Hash32) -> Self {
        Self { slot, block_hash }
    }
}

#[derive(Clone)]
pub struct CacheEntry {
    pub bid: SignedBuilderBid,
    pub origin_relays: Vec<ethereum_consensus::primitives::BlsPublicKey>,
    inserted_at: Instant,
}

#[derive(Default)]
pub struct BidCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl BidCache {
    pub fn new() -> Self {
        Self { entries: Mutex::new(HashMap::new()) }
    }

    /// Records the auction winner under `(slot, blockHash)`. Per (I3), a
    /// revisited slot overwrites rather than accumulates: the latest auction
    /// always wins.
    pub fn insert(
        &self,
        slot: Slot,
        block_hash: Hash32,
        bid: SignedBuilderBid,
        origin_relays: Vec<ethereum_consensus::primitives::BlsPublicKey>,
    ) {
        let key = CacheKey::new(slot, block_hash);
        let entry = CacheEntry { bid, origin_relays, inserted_at: Instant::now() };
        self.entries.lock().insert(key, entry);
    }

    pub fn get(&self, slot: Slot, block_hash: &Hash32) -> Option<CacheEntry> {
        let key = CacheKey::new(slot, block_hash.clone());
        self.entries.lock().get(&key).cloned()
    }

    /// Deletes entries older than the 3-minute TTL (I4). Intended to run on
    /// a fixed `SWEEP_INTERVAL` tick from the owning service.
    pub fn sweep(&self) {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.inserted_at.elapsed() <= ENTRY_TTL);
        let swept = before - entries.len();
        if swept > 0 {
            tracing::debug!(swept, remaining = entries.len(), "bid cache sweep");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use builder_api::types::{BidMessage, ExecutionPayloadHeader};
    use ethereum_consensus::primitives::BlsSignature;

    fn bid(block_hash: Hash32) -> SignedBuilderBid {
        SignedBuilderBid {
            message: BidMessage {
                slot: 1,
                parent_hash: Hash32::default(),
                proposer_public_key: Default::default(),
                block_hash: block_hash.clone(),
                value: Default::default(),
                header: ExecutionPayloadHeader { block_hash, ..Default::default() },
            },
            signature: BlsSignature::default(),
        }
    }

    #[test]
    fn insert_then_lookup_hits() {
        let cache = BidCache::new();
        let hash = Hash32::try_from([9u8; 32].as_ref()).unwrap();
        cache.insert(10, hash.clone(), bid(hash.clone()), vec![]);
        assert!(cache.get(10, &hash).is_some());
    }

    #[test]
    fn revisited_slot_overwrites_not_accumulates() {
        let cache = BidCache::new();
        let hash = Hash32::try_from([9u8; 32].as_ref()).unwrap();
        cache.insert(10, hash.clone(), bid(hash.clone()), vec![]);
        cache.insert(10, hash.clone(), bid(hash.clone()), vec![]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn miss_on_unknown_key_returns_none() {
        let cache = BidCache::new();
        let hash = Hash32::try_from([9u8; 32].as_ref()).unwrap();
        assert!(cache.get(10, &hash).is_none());
    }
}
