use ethereum_consensus::primitives::{ExecutionAddress, Hash32, Root, Slot};
use ssz_rs::prelude::*;

/// The fields of an execution payload header the multiplexer actually
/// inspects. A real header carries many more SSZ fields (state root, logs
/// bloom, withdrawals root, and so on); those are opaque to the auction and
/// redemption pipeline and are preserved verbatim through the JSON
/// round-trip rather than modeled here.
#[derive(Debug, Default, Clone, PartialEq, Eq, SimpleSerialize, serde::Serialize, serde::Deserialize)]
pub struct ExecutionPayloadHeader {
    pub parent_hash: Hash32,
    pub block_hash: Hash32,
    #[serde(with = "crate::serde::as_str")]
    pub block_number: u64,
    pub transactions_root: Root,
    pub fee_recipient: ExecutionAddress,
    #[serde(with = "crate::serde::as_str")]
    pub gas_limit: u64,
    #[serde(with = "crate::serde::as_str")]
    pub gas_used: u64,
}

/// The full execution payload redeemed from a relay. The core only ever
/// needs `block_hash` (P5) and forwards the rest verbatim.
#[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
pub struct ExecutionPayload {
    pub parent_hash: Hash32,
    pub block_hash: Hash32,
    #[serde(with = "crate::serde::as_str")]
    pub block_number: u64,
    pub transactions_root: Root,
    pub fee_recipient: ExecutionAddress,
    #[serde(with = "crate::serde::as_str")]
    pub gas_limit: u64,
    #[serde(with = "crate::serde::as_str")]
    pub gas_used: u64,
    #[serde(default)]
    pub transactions: Vec<String>,
}

impl ExecutionPayload {
    pub fn block_hash(&self) -> &Hash32 {
        &self.block_hash
    }
}

/// Capella-shaped blinded beacon block body: header only, no blob
/// commitments.
#[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
pub struct CapellaBlindedBeaconBlockBody {
    pub execution_payload_header: ExecutionPayloadHeader,
}

/// Deneb-shaped blinded beacon block body: header plus a count of blob KZG
/// commitments bound to the payload. The full commitment list is opaque to
/// this core and is not modeled.
#[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
pub struct DenebBlindedBeaconBlockBody {
    pub execution_payload_header: ExecutionPayloadHeader,
    #[serde(default, with = "crate::serde::as_str")]
    pub blob_kzg_commitments_count: u64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CapellaBlindedBeaconBlock {
    #[serde(with = "crate::serde::as_str")]
    pub slot: Slot,
    #[serde(with = "crate::serde::as_str")]
    pub proposer_index: u64,
    pub parent_root: Root,
    pub body: CapellaBlindedBeaconBlockBody,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DenebBlindedBeaconBlock {
    #[serde(with = "crate::serde::as_str")]
    pub slot: Slot,
    #[serde(with = "crate::serde::as_str")]
    pub proposer_index: u64,
    pub parent_root: Root,
    pub body: DenebBlindedBeaconBlockBody,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CapellaSignedBlindedBeaconBlock {
    pub message: CapellaBlindedBeaconBlock,
    pub signature: ethereum_consensus::primitives::BlsSignature,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DenebSignedBlindedBeaconBlock {
    pub message: DenebBlindedBeaconBlock,
    pub signature: ethereum_consensus::primitives::BlsSignature,
}

/// A signed blinded beacon block carrying either of the two accepted
/// fork-version shapes. This is a closed tagged union, not inheritance: the
/// two variants have genuinely different body shapes (Deneb adds a blob
/// commitment count), and callers must match on the variant rather than
/// treat one as a strict superset of the other.
#[derive(Debug, Clone)]
pub enum SignedBlindedBeaconBlock {
    Capella(CapellaSignedBlindedBeaconBlock),
    Deneb(DenebSignedBlindedBeaconBlock),
}

impl serde::Serialize for SignedBlindedBeaconBlock {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Capella(inner) => inner.serialize(serializer),
            Self::Deneb(inner) => inner.serialize(serializer),
        }
    }
}

impl<'de> serde::Deserialize<'de> for SignedBlindedBeaconBlock {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Try the newer (Deneb) shape first, then fall back to the older
        // (Capella) shape, per the redemption engine's decode order.
        let value = serde_json::Value::deserialize(deserializer)?;
        if let Ok(inner) = serde_json::from_value::<DenebSignedBlindedBeaconBlock>(value.clone()) {
            return Ok(Self::Deneb(inner));
        }
        if let Ok(inner) = serde_json::from_value::<CapellaSignedBlindedBeaconBlock>(value) {
            return Ok(Self::Capella(inner));
        }
        Err(serde::de::Error::custom("signed blinded beacon block matched neither accepted fork shape"))
    }
}

impl SignedBlindedBeaconBlock {
    pub fn slot(&self) -> Slot {
        match self {
            Self::Capella(inner) => inner.message.slot,
            Self::Deneb(inner) => inner.message.slot,
        }
    }

    pub fn parent_hash(&self) -> &Hash32 {
        match self {
            Self::Capella(inner) => &inner.message.body.execution_payload_header.parent_hash,
            Self::Deneb(inner) => &inner.message.body.execution_payload_header.parent_hash,
        }
    }

    pub fn block_hash(&self) -> &Hash32 {
        match self {
            Self::Capella(inner) => &inner.message.body.execution_payload_header.block_hash,
            Self::Deneb(inner) => &inner.message.body.execution_payload_header.block_hash,
        }
    }
}
