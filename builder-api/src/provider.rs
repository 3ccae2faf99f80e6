use crate::{
    error::Error,
    types::{BidRequest, ExecutionPayload, SignedBlindedBeaconBlock, SignedBuilderBid, SignedValidatorRegistration},
};
use async_trait::async_trait;

/// The four operations a builder-relay multiplexer exposes to a proposer.
/// `RelayMux` is the sole production implementation; the router (C9) is
/// generic over this trait so that tests can substitute a stub.
#[async_trait]
pub trait BlindedBlockProvider {
    async fn register_validators(&self, registrations: &[SignedValidatorRegistration]) -> Result<(), Error>;

    async fn fetch_best_bid(&self, bid_request: &BidRequest) -> Result<Option<SignedBuilderBid>, Error>;

    async fn open_bid(&self, signed_block: &SignedBlindedBeaconBlock) -> Result<ExecutionPayload, Error>;

    /// `true` if at least one relay responded successfully to a status
    /// check, or if the check is disabled entirely.
    async fn check_status(&self) -> bool;
}

#[async_trait]
impl<T: BlindedBlockProvider + Send + Sync> BlindedBlockProvider for std::sync::Arc<T> {
    async fn register_validators(&self, registrations: &[SignedValidatorRegistration]) -> Result<(), Error> {
        self.as_ref().register_validators(registrations).await
    }

    async fn fetch_best_bid(&self, bid_request: &BidRequest) -> Result<Option<SignedBuilderBid>, Error> {
        self.as_ref().fetch_best_bid(bid_request).await
    }

    async fn open_bid(&self, signed_block: &SignedBlindedBeaconBlock) -> Result<ExecutionPayload, Error> {
        self.as_ref().open_bid(signed_block).await
    }

    async fn check_status(&self) -> bool {
        self.as_ref().check_status().await
    }
}
