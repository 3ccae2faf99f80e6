//! C3: Bid Validator — the six-step structural, cryptographic, and policy
//! check applied to a single relay's signed header response (see the
//! auction's per-relay worker in `auction.rs`, which treats any
//! `ValidationError` here as "no bid from this relay", never as fatal).
use builder_api::{
    types::{is_known_fork_version, BidRequest, SignedBuilderBid, VersionedValue},
    ValidationError,
};
use ethereum_consensus::state_transition::Context;

/// Validate `envelope` against the requesting `request` and the relay's
/// known `expected_signer`. On success, returns the unwrapped bid with its
/// original signature intact, ready to be returned to the proposer verbatim.
pub fn validate_bid(
    envelope: VersionedValue<SignedBuilderBid>,
    request: &BidRequest,
    expected_signer: &ethereum_consensus::primitives::BlsPublicKey,
    minimum_bid: ethereum_consensus::ssz::prelude::U256,
    context: &Context,
) -> Result<SignedBuilderBid, ValidationError> {
    if !is_known_fork_version(&envelope.version) {
        return Err(ValidationError::UnknownFork(fork_from_name(&envelope.version)));
    }
    let mut bid = envelope.data;

    if bid.message.slot != request.slot {
        return Err(ValidationError::SlotMismatch { bid_slot: bid.message.slot, request_slot: request.slot });
    }
    if bid.message.parent_hash != request.parent_hash {
        return Err(ValidationError::ParentHashMismatch {
            bid: bid.message.parent_hash.clone(),
            request: request.parent_hash.clone(),
        });
    }
    if bid.message.proposer_public_key != request.public_key {
        return Err(ValidationError::ProposerMismatch {
            bid: bid.message.proposer_public_key.clone(),
            request: request.public_key.clone(),
        });
    }

    if bid.message.value == ethereum_consensus::ssz::prelude::U256::default() {
        return Err(ValidationError::ZeroValue);
    }
    if bid.message.value < minimum_bid {
        return Err(ValidationError::BelowMinimumBid);
    }

    bid.verify_signature(expected_signer, context).map_err(|_| ValidationError::InvalidSignature)?;

    if bid.message.block_hash != bid.message.header.block_hash {
        return Err(ValidationError::InconsistentBlockHash {
            advertised: bid.message.block_hash.clone(),
            header: bid.message.header.block_hash.clone(),
        });
    }

    Ok(bid)
}

fn fork_from_name(name: &str) -> ethereum_consensus::Fork {
    match name {
        "deneb" => ethereum_consensus::Fork::Deneb,
        "capella" => ethereum_consensus::Fork::Capella,
        _ => ethereum_consensus::Fork::Bellatrix,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use builder_api::{
        signing::sign_builder_message,
        types::{BidMessage, ExecutionPayloadHeader},
    };
    use ethereum_consensus::{crypto::SecretKey, primitives::Hash32, ssz::prelude::U256};
    use rand::thread_rng;

    fn request() -> BidRequest {
        BidRequest {
            slot: 100,
            parent_hash: Hash32::try_from([1u8; 32].as_ref()).unwrap(),
            public_key: ethereum_consensus::primitives::BlsPublicKey::default(),
        }
    }

    fn signed_bid(value: u64, block_hash: Hash32, key: &SecretKey, context: &Context) -> SignedBuilderBid {
        let request = request();
        let mut message = BidMessage {
            slot: request.slot,
            parent_hash: request.parent_hash.clone(),
            proposer_public_key: request.public_key.clone(),
            block_hash: block_hash.clone(),
            value: U256::from(value),
            header: ExecutionPayloadHeader { block_hash, ..Default::default() },
        };
        let signature = sign_builder_message(&mut message, key, context).unwrap();
        SignedBuilderBid { message, signature }
    }

    #[test]
    fn accepts_a_well_formed_bid() {
        let mut rng = thread_rng();
        let key = SecretKey::random(&mut rng).unwrap();
        let context = Context::for_holesky();
        let bid = signed_bid(1_000_000, Hash32::try_from([2u8; 32].as_ref()).unwrap(), &key, &context);
        let envelope = VersionedValue { version: "deneb".to_string(), data: bid };
        let result = validate_bid(envelope, &request(), &key.public_key(), U256::from(1u64), &context);
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_unknown_fork_version() {
        let mut rng = thread_rng();
        let key = SecretKey::random(&mut rng).unwrap();
        let context = Context::for_holesky();
        let bid = signed_bid(1_000_000, Hash32::try_from([2u8; 32].as_ref()).unwrap(), &key, &context);
        let envelope = VersionedValue { version: "bellatrix".to_string(), data: bid };
        let err = validate_bid(envelope, &request(), &key.public_key(), U256::from(1u64), &context).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownFork(_)));
    }

    #[test]
    fn rejects_zero_value() {
        let mut rng = thread_rng();
        let key = SecretKey::random(&mut rng).unwrap();
        let context = Context::for_holesky();
        let bid = signed_bid(0, Hash32::try_from([2u8; 32].as_ref()).unwrap(), &key, &context);
        let envelope = VersionedValue { version: "deneb".to_string(), data: bid };
        let err = validate_bid(envelope, &request(), &key.public_key(), U256::from(1u64), &context).unwrap_err();
        assert!(matches!(err, ValidationError::ZeroValue));
    }

    #[test]
    fn rejects_value_below_minimum() {
        let mut rng = thread_rng();
        let key = SecretKey::random(&mut rng).unwrap();
        let context = Context::for_holesky();
        let bid = signed_bid(5, Hash32::try_from([2u8; 32].as_ref()).unwrap(), &key, &context);
        let envelope = VersionedValue { version: "deneb".to_string(), data: bid };
        let err = validate_bid(envelope, &request(), &key.public_key(), U256::from(10u64), &context).unwrap_err();
        assert!(matches!(err, ValidationError::BelowMinimumBid));
    }

    #[test]
    fn rejects_signature_under_wrong_key() {
        let mut rng = thread_rng();
        let key = SecretKey::random(&mut rng).unwrap();
        let other_key = SecretKey::random(&mut rng).unwrap();
        let context = Context::for_holesky();
        let bid = signed_bid(1_000, Hash32::try_from([2u8; 32].as_ref()).unwrap(), &key, &context);
        let envelope = VersionedValue { version: "deneb".to_string(), data: bid };
        let err =
            validate_bid(envelope, &request(), &other_key.public_key(), U256::from(1u64), &context).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidSignature));
    }

    #[test]
    fn rejects_mismatched_slot() {
        let mut rng = thread_rng();
        let key = SecretKey::random(&mut rng).unwrap();
        let context = Context::for_holesky();
        let bid = signed_bid(1_000, Hash32::try_from([2u8; 32].as_ref()).unwrap(), &key, &context);
        let envelope = VersionedValue { version: "deneb".to_string(), data: bid };
        let mut other_request = request();
        other_request.slot = 101;
        let err = validate_bid(envelope, &other_request, &key.public_key(), U256::from(1u64), &context).unwrap_err();
        assert!(matches!(err, ValidationError::SlotMismatch { .. }));
    }
}
