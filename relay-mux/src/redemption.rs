//! C5: Redemption Engine — fans the signed blinded block out to every
//! relay, takes the first response whose payload matches the requested
//! block hash, cancels the rest, and logs a withholding event naming the
//! remembered bid's origin relays when nobody delivers.
use crate::{
    bid_cache::BidCache,
    http_client::{CallClass, HttpClients},
    relay::RelayDirectory,
    slot_uid::{format_uid, SlotUidTracker},
};
use builder_api::types::{ExecutionPayload, SignedBlindedBeaconBlock, VersionedValue};
use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::Method;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Clone)]
pub struct Redemption {
    relays: RelayDirectory,
    http: HttpClients,
    cache: Arc<BidCache>,
    slot_uid: Arc<SlotUidTracker>,
    user_agent: String,
}

impl Redemption {
    pub fn new(
        relays: RelayDirectory,
        http: HttpClients,
        cache: Arc<BidCache>,
        slot_uid: Arc<SlotUidTracker>,
        user_agent: String,
    ) -> Self {
        Self { relays, http, cache, slot_uid, user_agent }
    }

    pub async fn run(&self, signed_block: &SignedBlindedBeaconBlock) -> Option<ExecutionPayload> {
        let requested_hash = signed_block.block_hash().clone();
        let remembered = self.cache.get(signed_block.slot(), &requested_hash);
        if remembered.is_none() {
            tracing::debug!(slot = signed_block.slot(), "bid cache miss on redemption; forwarding anyway");
        }

        let uid = format_uid(self.slot_uid.uid_for_slot(signed_block.slot()));
        let (cancel_tx, _) = watch::channel(false);

        let mut in_flight: FuturesUnordered<_> = self
            .relays
            .relays()
            .iter()
            .cloned()
            .map(|relay| {
                let redemption = self.clone();
                let signed_block = signed_block.clone();
                let uid = uid.clone();
                let requested_hash = requested_hash.clone();
                let cancel_rx = cancel_tx.subscribe();
                tokio::spawn(async move {
                    redemption.redeem_from(&relay, &signed_block, &uid, &requested_hash, cancel_rx).await
                })
            })
            .collect();

        // Take the first relay whose payload actually matches; every other
        // in-flight request is cancelled via `cancel_tx` as soon as that
        // happens, rather than waited on.
        let mut winner = None;
        while let Some(result) = in_flight.next().await {
            match result {
                Ok(Some(payload)) => {
                    winner = Some(payload);
                    break;
                }
                Ok(None) => continue,
                Err(err) => {
                    tracing::warn!(%err, "redemption task panicked");
                    continue;
                }
            }
        }

        if winner.is_some() {
            let _ = cancel_tx.send(true);
        } else if let Some(entry) = remembered {
            let origins: Vec<String> = entry.origin_relays.iter().map(|key| key.to_string()).collect();
            for origin in &origins {
                crate::metrics::record_withholding(origin);
            }
            tracing::error!(
                slot = signed_block.slot(),
                block_hash = %requested_hash,
                origin_relays = ?origins,
                "payload withheld: no relay delivered the redeemed block"
            );
        }

        winner
    }

    async fn redeem_from(
        &self,
        relay: &crate::relay::Relay,
        signed_block: &SignedBlindedBeaconBlock,
        uid: &str,
        requested_hash: &ethereum_consensus::primitives::Hash32,
        mut cancel_rx: watch::Receiver<bool>,
    ) -> Option<ExecutionPayload> {
        let url = relay.uri("/eth/v1/builder/blinded_blocks");
        let request = self.http.send::<SignedBlindedBeaconBlock, VersionedValue<ExecutionPayload>>(
            CallClass::Payload,
            Method::POST,
            &url,
            Some(&self.user_agent),
            Some(uid),
            Some(signed_block),
        );

        tokio::select! {
            result = request => {
                match result {
                    Ok(Some(envelope)) if envelope.data.block_hash() == requested_hash => Some(envelope.data),
                    Ok(Some(_)) => {
                        tracing::warn!(relay = %relay, "payload block hash did not match requested block hash");
                        None
                    }
                    Ok(None) => None,
                    Err(err) => {
                        tracing::warn!(relay = %relay, %err, "payload request failed");
                        None
                    }
                }
            }
            _ = cancel_rx.changed() => None,
        }
    }
}
