//! A minimal relay double: implements `BlindedBlockProvider` in-memory and
//! is served through the same `Server` (C9) the production binary uses, so
//! the multiplexer under test talks real HTTP to it.
use async_trait::async_trait;
use builder_api::{
    signing::sign_builder_message,
    types::{
        BidMessage, BidRequest, ExecutionPayload, ExecutionPayloadHeader, SignedBlindedBeaconBlock,
        SignedBuilderBid, SignedValidatorRegistration,
    },
    BlindedBlockProvider, Error,
};
use ethereum_consensus::{
    crypto::SecretKey, primitives::BlsPublicKey, ssz::prelude::U256, state_transition::Context,
};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockRelay {
    signing_key: Arc<SecretKey>,
    public_key: BlsPublicKey,
    context: Arc<Context>,
    value: u64,
    /// When `Some`, `open_bid` returns nothing — simulating a withholding relay.
    withhold_payload: bool,
    registrations: Arc<Mutex<Vec<SignedValidatorRegistration>>>,
}

impl MockRelay {
    pub fn new(context: Context, value: u64, withhold_payload: bool) -> Self {
        let mut seed = [0u8; 32];
        seed[0] = value as u8;
        seed[1] = withhold_payload as u8 + 1;
        let signing_key = SecretKey::try_from(seed.as_ref()).unwrap();
        let public_key = signing_key.public_key();
        Self {
            signing_key: Arc::new(signing_key),
            public_key,
            context: Arc::new(context),
            value,
            withhold_payload,
            registrations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn public_key(&self) -> &BlsPublicKey {
        &self.public_key
    }
}

#[async_trait]
impl BlindedBlockProvider for MockRelay {
    async fn register_validators(&self, registrations: &[SignedValidatorRegistration]) -> Result<(), Error> {
        self.registrations.lock().unwrap().extend_from_slice(registrations);
        Ok(())
    }

    async fn fetch_best_bid(&self, bid_request: &BidRequest) -> Result<Option<SignedBuilderBid>, Error> {
        let block_hash = ethereum_consensus::primitives::Hash32::try_from([self.value as u8; 32].as_ref()).unwrap();
        let mut message = BidMessage {
            slot: bid_request.slot,
            parent_hash: bid_request.parent_hash.clone(),
            proposer_public_key: bid_request.public_key.clone(),
            block_hash: block_hash.clone(),
            value: U256::from(self.value),
            header: ExecutionPayloadHeader { block_hash, ..Default::default() },
        };
        let signature = sign_builder_message(&mut message, &self.signing_key, &self.context).unwrap();
        Ok(Some(SignedBuilderBid { message, signature }))
    }

    async fn open_bid(&self, signed_block: &SignedBlindedBeaconBlock) -> Result<ExecutionPayload, Error> {
        if self.withhold_payload {
            return Err(Error::NoSuccessfulRelayResponse);
        }
        Ok(ExecutionPayload {
            parent_hash: signed_block.parent_hash().clone(),
            block_hash: signed_block.block_hash().clone(),
            ..Default::default()
        })
    }

    async fn check_status(&self) -> bool {
        true
    }
}
