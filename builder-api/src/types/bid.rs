use crate::{signing::compute_builder_signing_root, types::ExecutionPayloadHeader};
use ethereum_consensus::{
    primitives::{BlsPublicKey, BlsSignature, Hash32, Slot},
    state_transition::{Context, Error},
};
use ssz_rs::prelude::*;

/// A single relay's signed commitment to a block header. `block_hash` is the
/// advertised hash used for selection and cache keying; `header.block_hash`
/// is the value embedded in the enclosed execution header. The validator
/// asserts the two agree (§4.3 item 6) before the bid is ever considered.
#[derive(Debug, Clone, SimpleSerialize, serde::Serialize, serde::Deserialize)]
pub struct BidMessage {
    #[serde(with = "crate::serde::as_str")]
    pub slot: Slot,
    pub parent_hash: Hash32,
    #[serde(rename = "pubkey")]
    pub proposer_public_key: BlsPublicKey,
    pub block_hash: Hash32,
    #[serde(with = "crate::serde::as_str")]
    pub value: U256,
    pub header: ExecutionPayloadHeader,
}

impl std::fmt::Display for BidMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "block hash {} and value {}", self.block_hash, self.value)
    }
}

#[derive(Debug, Clone, SimpleSerialize, serde::Serialize, serde::Deserialize)]
pub struct SignedBuilderBid {
    pub message: BidMessage,
    pub signature: BlsSignature,
}

impl SignedBuilderBid {
    pub fn verify_signature(&mut self, public_key: &BlsPublicKey, context: &Context) -> Result<(), Error> {
        let signing_root = compute_builder_signing_root(&mut self.message, context)?;
        crate::signing::verify_signature(public_key, signing_root.as_ref(), &self.signature)
    }
}

impl std::fmt::Display for SignedBuilderBid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// The outer fork-version envelope every builder API response is wrapped in:
/// `{"version": "capella", "data": {...}}`. Decoding rejects unknown
/// versions outright (§4.3 item 1); recognized versions are `capella` and
/// `deneb`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct VersionedValue<T> {
    pub version: String,
    pub data: T,
}

pub const KNOWN_FORK_VERSIONS: &[&str] = &["capella", "deneb"];

pub fn is_known_fork_version(version: &str) -> bool {
    KNOWN_FORK_VERSIONS.contains(&version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{signing::sign_builder_message, types::ExecutionPayloadHeader};
    use ethereum_consensus::{crypto::SecretKey, primitives::Hash32, state_transition::Context};
    use rand::thread_rng;

    fn bid_message(value: u64, block_hash: Hash32) -> BidMessage {
        BidMessage {
            slot: 100,
            parent_hash: Hash32::default(),
            proposer_public_key: BlsPublicKey::default(),
            block_hash: block_hash.clone(),
            value: U256::from(value),
            header: ExecutionPayloadHeader { block_hash, ..Default::default() },
        }
    }

    #[test]
    fn round_trips_through_json() {
        let message = bid_message(2_000_000_000_000_000_000, Hash32::try_from([7u8; 32].as_ref()).unwrap());
        let signed = SignedBuilderBid { message, signature: BlsSignature::default() };
        let envelope = VersionedValue { version: "capella".to_string(), data: signed };
        let json = serde_json::to_string(&envelope).unwrap();
        let decoded: VersionedValue<SignedBuilderBid> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.data.message.value, U256::from(2_000_000_000_000_000_000u64));
    }

    #[test]
    fn unknown_fork_version_is_rejected() {
        assert!(!is_known_fork_version("bellatrix"));
        assert!(is_known_fork_version("deneb"));
    }

    #[test]
    fn signature_verifies_under_signing_key() {
        let mut rng = thread_rng();
        let key = SecretKey::random(&mut rng).unwrap();
        let public_key = key.public_key();
        let context = Context::for_holesky();
        let mut message = bid_message(1_000, Hash32::try_from([1u8; 32].as_ref()).unwrap());
        let signature = sign_builder_message(&mut message, &key, &context).unwrap();
        let mut signed = SignedBuilderBid { message, signature };
        signed.verify_signature(&public_key, &context).expect("signature is valid");
    }
}
