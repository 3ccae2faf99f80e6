mod bid;
mod bid_request;
mod payload;

pub use bid::{is_known_fork_version, BidMessage, SignedBuilderBid, VersionedValue, KNOWN_FORK_VERSIONS};
pub use bid_request::BidRequest;
pub use ethereum_consensus::builder::SignedValidatorRegistration;
pub use payload::{
    CapellaBlindedBeaconBlock, CapellaBlindedBeaconBlockBody, CapellaSignedBlindedBeaconBlock,
    DenebBlindedBeaconBlock, DenebBlindedBeaconBlockBody, DenebSignedBlindedBeaconBlock,
    ExecutionPayload, ExecutionPayloadHeader, SignedBlindedBeaconBlock,
};
