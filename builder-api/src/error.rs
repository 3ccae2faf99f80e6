use ethereum_consensus::{
    primitives::{BlsPublicKey, Hash32},
    Error as ConsensusError, Fork,
};
use thiserror::Error;

/// Structural or cryptographic defect found in a single relay's response.
///
/// These never propagate as a request failure; the auction and redemption
/// engines catch them at the relay boundary and log a rejection instead.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("unrecognized fork version {0:?}")]
    UnknownFork(Fork),
    #[error("bid is for slot {bid_slot} but request was for slot {request_slot}")]
    SlotMismatch { bid_slot: u64, request_slot: u64 },
    #[error("bid parent hash {bid} does not match requested parent hash {request}")]
    ParentHashMismatch { bid: Hash32, request: Hash32 },
    #[error("bid proposer {bid} does not match requested proposer {request}")]
    ProposerMismatch { bid: BlsPublicKey, request: BlsPublicKey },
    #[error("declared value is zero")]
    ZeroValue,
    #[error("declared value is below the configured minimum bid")]
    BelowMinimumBid,
    #[error("signature does not verify under the relay's expected public key")]
    InvalidSignature,
    #[error("advertised block hash {advertised} does not match header block hash {header}")]
    InconsistentBlockHash { advertised: Hash32, header: Hash32 },
    #[error(transparent)]
    Consensus(#[from] ConsensusError),
}

/// Failures surfaced to the caller as an HTTP response.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not register with any relay")]
    CouldNotRegister,
    #[error("no successful relay response")]
    NoSuccessfulRelayResponse,
    #[error("malformed slot `{0}`")]
    InvalidSlot(String),
    #[error("malformed hash `{0}`")]
    InvalidHash(String),
    #[error("malformed public key `{0}`")]
    InvalidPublicKey(String),
    #[error(transparent)]
    Consensus(#[from] ConsensusError),
}
