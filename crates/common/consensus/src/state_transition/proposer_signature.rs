use strata_bls::SignatureBackend;
use tree_hash::TreeHash;

use crate::{
    beacon_block::BeaconBlock,
    beacon_state::BeaconState,
    constants::{BEACON_CHAIN_SHARD_NUMBER, DOMAIN_PROPOSAL},
    errors::{BlockInvalid, BlockProcessingError},
    proposal_signed_data::ProposalSignedData,
};

impl BeaconState {
    /// The message the proposer of the current slot signs for ``block``.
    pub fn block_proposal(&self, block: &BeaconBlock) -> ProposalSignedData {
        ProposalSignedData {
            slot: self.slot,
            shard: BEACON_CHAIN_SHARD_NUMBER,
            block_root: block.signed_root(),
        }
    }

    /// Verify that ``block`` is signed by the proposer of the current slot.
    pub fn verify_block_signature(
        &self,
        block: &BeaconBlock,
        backend: &impl SignatureBackend,
    ) -> Result<(), BlockProcessingError> {
        let proposer = self.get_validator(self.get_beacon_proposer_index(self.slot)?)?;
        let is_valid = backend
            .verify(
                &proposer.pubkey,
                self.block_proposal(block).tree_hash_root(),
                &block.signature,
                self.get_domain(self.get_current_epoch(), DOMAIN_PROPOSAL),
            )
            .map_err(|err| BlockProcessingError::BeaconState(err.into()))?;
        if !is_valid {
            return Err(BlockInvalid::BadSignature.into());
        }
        Ok(())
    }
}
