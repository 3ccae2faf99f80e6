//! Thin wrappers over the builder signing domain and BLS verification.
//!
//! These are the two external collaborators the validation pipeline treats
//! as black boxes: `compute_builder_domain`/`compute_signing_root` mix the
//! builder `DomainType` into a signing root, and `verify_signature` checks a
//! BLS signature against a public key and message root. Neither is
//! reimplemented here; both come straight from `ethereum-consensus`.
pub use ethereum_consensus::signing::{compute_signing_root, verify_signature};
use ethereum_consensus::{
    builder::compute_builder_domain,
    crypto::SecretKey,
    primitives::{BlsPublicKey, BlsSignature},
    ssz::prelude::SimpleSerialize,
    state_transition::{Context, Error},
};

/// Sign `message` under the builder domain for `context`. Used by relays
/// (and, in tests, by the mock relay harness) to produce a `SignedBuilderBid`.
pub fn sign_builder_message<T: SimpleSerialize>(
    message: &mut T,
    signing_key: &SecretKey,
    context: &Context,
) -> Result<BlsSignature, Error> {
    let domain = compute_builder_domain(context)?;
    sign_with_domain(message, signing_key, domain)
}

fn sign_with_domain<T: SimpleSerialize>(
    message: &mut T,
    signing_key: &SecretKey,
    domain: ethereum_consensus::primitives::Domain,
) -> Result<BlsSignature, Error> {
    ethereum_consensus::signing::sign_with_domain(message, signing_key, domain)
}

/// Recompute the builder signing root for `data` under `context`.
pub fn compute_builder_signing_root<T: SimpleSerialize>(
    data: &mut T,
    context: &Context,
) -> Result<ethereum_consensus::primitives::Root, Error> {
    let domain = compute_builder_domain(context)?;
    compute_signing_root(data, domain)
}

/// Recompute the signing root for `message` and verify `signature` against
/// `public_key` under the builder domain for `context`. This is the single
/// entry point the bid validator and relay mux use; a `false`-shaped result
/// (an `Err`) is always treated as "no bid", never as a fatal error.
pub fn verify_builder_signature<T: SimpleSerialize>(
    message: &mut T,
    signature: &BlsSignature,
    public_key: &BlsPublicKey,
    context: &Context,
) -> Result<(), Error> {
    let signing_root = compute_builder_signing_root(message, context)?;
    verify_signature(public_key, signing_root.as_ref(), signature)
}
