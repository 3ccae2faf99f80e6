//! Wires the relay directory, HTTP clients, bid cache, slot UID tracker,
//! and the auction/redemption/registration engines into the single
//! `BlindedBlockProvider` the router dispatches to.
use crate::{
    auction::Auction,
    bid_cache::BidCache,
    http_client::{CallClass, HttpClients},
    redemption::Redemption,
    registration::RegistrationBroadcaster,
    relay::RelayDirectory,
    slot_uid::SlotUidTracker,
};
use async_trait::async_trait;
use builder_api::{
    types::{BidRequest, ExecutionPayload, SignedBlindedBeaconBlock, SignedBuilderBid, SignedValidatorRegistration},
    BlindedBlockProvider, Error,
};
use ethereum_consensus::{ssz::prelude::U256, state_transition::Context};
use reqwest::Method;
use std::sync::Arc;

pub struct RelayMux {
    relays: RelayDirectory,
    http: HttpClients,
    auction: Auction,
    redemption: Redemption,
    registration: RegistrationBroadcaster,
    cache: Arc<BidCache>,
    user_agent: String,
}

impl RelayMux {
    pub fn new(
        relays: RelayDirectory,
        monitors: Vec<String>,
        http: HttpClients,
        minimum_bid: U256,
        context: Context,
        user_agent: String,
    ) -> Self {
        let cache = Arc::new(BidCache::new());
        let slot_uid = Arc::new(SlotUidTracker::new());

        let auction = Auction::new(
            relays.clone(),
            http.clone(),
            cache.clone(),
            slot_uid.clone(),
            minimum_bid,
            context,
            user_agent.clone(),
        );
        let redemption =
            Redemption::new(relays.clone(), http.clone(), cache.clone(), slot_uid, user_agent.clone());
        let registration = RegistrationBroadcaster::new(relays.clone(), monitors, http.clone(), user_agent.clone());

        Self { relays, http, auction, redemption, registration, cache, user_agent }
    }

    /// Runs the Bid Cache sweeper; intended to be driven by the owning
    /// service on a fixed interval (`bid_cache::SWEEP_INTERVAL`).
    pub fn sweep_cache(&self) {
        self.cache.sweep();
    }
}

#[async_trait]
impl BlindedBlockProvider for RelayMux {
    async fn register_validators(&self, registrations: &[SignedValidatorRegistration]) -> Result<(), Error> {
        self.registration.broadcast(registrations).await.map_err(|_| Error::CouldNotRegister)
    }

    async fn fetch_best_bid(&self, bid_request: &BidRequest) -> Result<Option<SignedBuilderBid>, Error> {
        Ok(self.auction.run(bid_request).await)
    }

    async fn open_bid(&self, signed_block: &SignedBlindedBeaconBlock) -> Result<ExecutionPayload, Error> {
        self.redemption.run(signed_block).await.ok_or(Error::NoSuccessfulRelayResponse)
    }

    async fn check_status(&self) -> bool {
        let checks = self.relays.relays().iter().map(|relay| {
            let url = relay.uri("/eth/v1/builder/status");
            let http = &self.http;
            let user_agent = &self.user_agent;
            async move {
                http.send::<(), ()>(CallClass::Header, Method::GET, &url, Some(user_agent), None, None)
                    .await
                    .is_ok()
            }
        });
        futures::future::join_all(checks).await.into_iter().any(|ok| ok)
    }
}
