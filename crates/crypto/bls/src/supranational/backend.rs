use alloy_primitives::B256;
use blst::{
    BLST_ERROR,
    min_pk::{AggregatePublicKey as BlstAggregatePublicKey, PublicKey as BlstPublicKey},
};

use crate::{
    BLSSignature, PrivateKey, PubKey,
    constants::DST,
    errors::BLSError,
    traits::{SignatureBackend, domain_message},
};

/// [SignatureBackend] backed by the supranational `blst` library.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlstBackend;

impl SignatureBackend for BlstBackend {
    fn sign(
        &self,
        private_key: &PrivateKey,
        message: B256,
        domain: u64,
    ) -> Result<BLSSignature, BLSError> {
        let secret_key = private_key.to_blst_secret_key()?;
        Ok(secret_key
            .sign(&domain_message(message, domain), DST, &[])
            .into())
    }

    fn verify(
        &self,
        pubkey: &PubKey,
        message: B256,
        signature: &BLSSignature,
        domain: u64,
    ) -> Result<bool, BLSError> {
        let signature = signature.to_blst_signature()?;
        let public_key = pubkey.to_blst_pubkey()?;

        Ok(signature.verify(
            true,
            &domain_message(message, domain),
            DST,
            &[],
            &public_key,
            true,
        ) == BLST_ERROR::BLST_SUCCESS)
    }

    fn verify_multiple(
        &self,
        pubkeys: &[PubKey],
        messages: &[B256],
        signature: &BLSSignature,
        domain: u64,
    ) -> Result<bool, BLSError> {
        if pubkeys.len() != messages.len() {
            return Err(BLSError::MessageCountMismatch {
                pubkeys: pubkeys.len(),
                messages: messages.len(),
            });
        }
        if pubkeys.is_empty() {
            return Ok(false);
        }

        let signature = signature.to_blst_signature()?;
        let public_keys = pubkeys
            .iter()
            .map(|pubkey| pubkey.to_blst_pubkey())
            .collect::<Result<Vec<_>, _>>()?;
        let domain_messages = messages
            .iter()
            .map(|message| domain_message(*message, domain))
            .collect::<Vec<_>>();

        Ok(signature.aggregate_verify(
            true,
            &domain_messages
                .iter()
                .map(|message| message.as_slice())
                .collect::<Vec<_>>(),
            DST,
            &public_keys.iter().collect::<Vec<&BlstPublicKey>>(),
            true,
        ) == BLST_ERROR::BLST_SUCCESS)
    }

    fn aggregate_pubkeys(&self, pubkeys: &[&PubKey]) -> Result<PubKey, BLSError> {
        if pubkeys.is_empty() {
            return Err(BLSError::EmptyAggregate);
        }
        let public_keys = pubkeys
            .iter()
            .map(|pubkey| pubkey.to_blst_pubkey())
            .collect::<Result<Vec<_>, _>>()?;
        let aggregate_public_key =
            BlstAggregatePublicKey::aggregate(&public_keys.iter().collect::<Vec<_>>(), true)
                .map_err(|err| BLSError::BlstError(format!("{err:?}")))?;
        Ok(aggregate_public_key.to_public_key().into())
    }
}
