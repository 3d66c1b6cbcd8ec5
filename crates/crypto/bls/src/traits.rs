use alloy_primitives::B256;

use crate::{BLSSignature, PrivateKey, PubKey, errors::BLSError};

/// Signing and verification capability consumed by the state transition.
///
/// Every message is a 32 byte digest that is bound to a `domain` before signing, so a signature
/// produced under one domain never verifies under another.
pub trait SignatureBackend {
    /// Signs `message` under `domain` with `private_key`.
    fn sign(
        &self,
        private_key: &PrivateKey,
        message: B256,
        domain: u64,
    ) -> Result<BLSSignature, BLSError>;

    /// Verifies a BLS signature against a public key and message.
    ///
    /// # Returns
    /// * `Result<bool, BLSError>` - Ok(true) if the signature is valid, Ok(false) if verification
    ///   fails, or Err if there are issues with signature or public key bytes
    fn verify(
        &self,
        pubkey: &PubKey,
        message: B256,
        signature: &BLSSignature,
        domain: u64,
    ) -> Result<bool, BLSError>;

    /// Verifies an aggregate signature where `pubkeys[i]` signed `messages[i]`.
    fn verify_multiple(
        &self,
        pubkeys: &[PubKey],
        messages: &[B256],
        signature: &BLSSignature,
        domain: u64,
    ) -> Result<bool, BLSError>;

    /// Returns the aggregate of ``pubkeys``. Fails on an empty input.
    fn aggregate_pubkeys(&self, pubkeys: &[&PubKey]) -> Result<PubKey, BLSError>;
}

/// Binds a message digest to a signature domain.
pub fn domain_message(message: B256, domain: u64) -> [u8; 40] {
    let mut bytes = [0u8; 40];
    bytes[..32].copy_from_slice(message.as_slice());
    bytes[32..].copy_from_slice(&domain.to_le_bytes());
    bytes
}
