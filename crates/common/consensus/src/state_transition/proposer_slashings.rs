use strata_bls::SignatureBackend;
use tracing::debug;
use tree_hash::TreeHash;

use crate::{
    beacon_state::BeaconState,
    constants::DOMAIN_PROPOSAL,
    errors::{
        BlockProcessingError, IntoWithIndex, ProposerSlashingInvalid as Invalid,
        ProposerSlashingValidationError as Error,
    },
    misc::compute_epoch_at_slot,
    proposer_slashing::ProposerSlashing,
};

impl BeaconState {
    /// Check that ``proposer_slashing`` proves two conflicting proposals by an unslashed proposer.
    pub fn verify_proposer_slashing(
        &self,
        proposer_slashing: &ProposerSlashing,
        backend: &impl SignatureBackend,
    ) -> Result<(), Error> {
        let proposer_index = proposer_slashing.proposer_index;
        let proposer = self
            .get_validator(proposer_index)
            .map_err(|_| Error::Invalid(Invalid::ProposerUnknown(proposer_index)))?;

        let proposal_1 = &proposer_slashing.proposal_data_1;
        let proposal_2 = &proposer_slashing.proposal_data_2;
        verify!(proposal_1.slot == proposal_2.slot, Invalid::ProposalSlotMismatch);
        verify!(
            proposal_1.shard == proposal_2.shard,
            Invalid::ProposalShardMismatch
        );
        verify!(
            proposal_1.block_root != proposal_2.block_root,
            Invalid::ProposalBlockRootsIdentical
        );
        verify!(
            proposer.slashed_epoch > self.get_current_epoch(),
            Invalid::ProposerAlreadySlashed(proposer_index)
        );

        for (proposal, signature, invalid) in [
            (
                proposal_1,
                &proposer_slashing.proposal_signature_1,
                Invalid::BadProposal1Signature,
            ),
            (
                proposal_2,
                &proposer_slashing.proposal_signature_2,
                Invalid::BadProposal2Signature,
            ),
        ] {
            let domain = self.get_domain(compute_epoch_at_slot(proposal.slot), DOMAIN_PROPOSAL);
            let is_valid = backend
                .verify(
                    &proposer.pubkey,
                    proposal.tree_hash_root(),
                    signature,
                    domain,
                )
                .map_err(|err| Error::BeaconState(err.into()))?;
            verify!(is_valid, invalid);
        }

        Ok(())
    }

    pub fn process_proposer_slashing(
        &mut self,
        proposer_slashing: &ProposerSlashing,
        backend: &impl SignatureBackend,
    ) -> Result<(), Error> {
        self.verify_proposer_slashing(proposer_slashing, backend)?;
        self.slash_validator(proposer_slashing.proposer_index)?;
        debug!(
            proposer_index = proposer_slashing.proposer_index,
            "Processed proposer slashing"
        );
        Ok(())
    }

    pub fn process_proposer_slashings(
        &mut self,
        proposer_slashings: &[ProposerSlashing],
        backend: &impl SignatureBackend,
    ) -> Result<(), BlockProcessingError> {
        for (index, proposer_slashing) in proposer_slashings.iter().enumerate() {
            self.process_proposer_slashing(proposer_slashing, backend)
                .map_err(|err| err.into_with_index(index))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;
    use rstest::rstest;
    use strata_bls::{BLSSignature, BlstBackend};

    use super::*;
    use crate::{
        constants::{
            ACTIVATION_EXIT_DELAY, GENESIS_EPOCH, GENESIS_SLOT, LATEST_SLASHED_EXIT_LENGTH,
            MAX_DEPOSIT_AMOUNT, WHISTLEBLOWER_REWARD_QUOTIENT,
        },
        errors::{BlockInvalid, ErrorCategory},
        proposal_signed_data::ProposalSignedData,
        test_utils::{genesis_state, private_key},
    };

    fn sign_proposal(
        state: &BeaconState,
        proposer_index: u64,
        proposal: &ProposalSignedData,
    ) -> BLSSignature {
        BlstBackend
            .sign(
                &private_key(proposer_index),
                proposal.tree_hash_root(),
                state.get_domain(compute_epoch_at_slot(proposal.slot), DOMAIN_PROPOSAL),
            )
            .unwrap()
    }

    fn proposer_slashing(state: &BeaconState, proposer_index: u64) -> ProposerSlashing {
        let proposal_data_1 = ProposalSignedData {
            slot: GENESIS_SLOT,
            shard: 0,
            block_root: B256::repeat_byte(1),
        };
        let proposal_data_2 = ProposalSignedData {
            block_root: B256::repeat_byte(2),
            ..proposal_data_1.clone()
        };
        ProposerSlashing {
            proposer_index,
            proposal_signature_1: sign_proposal(state, proposer_index, &proposal_data_1),
            proposal_data_1,
            proposal_signature_2: sign_proposal(state, proposer_index, &proposal_data_2),
            proposal_data_2,
        }
    }

    #[test]
    fn test_proposer_slashing_slashes_and_rewards_whistleblower() {
        let mut state = genesis_state(128);
        let whistleblower_index = state.get_beacon_proposer_index(state.slot).unwrap();
        let slashed_index = (whistleblower_index + 1) % 128;
        let slashing = proposer_slashing(&state, slashed_index);

        state
            .process_proposer_slashing(&slashing, &BlstBackend)
            .unwrap();

        let reward = MAX_DEPOSIT_AMOUNT / WHISTLEBLOWER_REWARD_QUOTIENT;
        let validator = &state.validator_registry[slashed_index as usize];
        assert!(validator.slashed);
        assert_eq!(validator.slashed_epoch, GENESIS_EPOCH);
        assert_eq!(validator.exit_epoch, GENESIS_EPOCH + 1 + ACTIVATION_EXIT_DELAY);
        assert_eq!(
            validator.withdrawable_epoch,
            GENESIS_EPOCH + LATEST_SLASHED_EXIT_LENGTH
        );
        assert_eq!(
            state.validator_balances[slashed_index as usize],
            MAX_DEPOSIT_AMOUNT - reward
        );
        assert_eq!(
            state.validator_balances[whistleblower_index as usize],
            MAX_DEPOSIT_AMOUNT + reward
        );
        assert_eq!(
            state.latest_slashed_balances[(GENESIS_EPOCH % LATEST_SLASHED_EXIT_LENGTH) as usize],
            MAX_DEPOSIT_AMOUNT
        );
    }

    #[test]
    fn test_proposer_cannot_be_slashed_twice() {
        let mut state = genesis_state(128);
        let slashing = proposer_slashing(&state, 3);

        let err = state
            .process_proposer_slashings(&[slashing.clone(), slashing], &BlstBackend)
            .unwrap_err();

        assert_eq!(
            err,
            BlockProcessingError::Invalid(BlockInvalid::ProposerSlashingInvalid(
                1,
                Invalid::ProposerAlreadySlashed(3)
            ))
        );
        assert_eq!(err.category(), ErrorCategory::Window);
    }

    #[rstest]
    #[case::slot(ProposalSignedData { slot: GENESIS_SLOT + 1, shard: 0, block_root: B256::repeat_byte(2) }, Invalid::ProposalSlotMismatch)]
    #[case::shard(ProposalSignedData { slot: GENESIS_SLOT, shard: 1, block_root: B256::repeat_byte(2) }, Invalid::ProposalShardMismatch)]
    #[case::same_root(ProposalSignedData { slot: GENESIS_SLOT, shard: 0, block_root: B256::repeat_byte(1) }, Invalid::ProposalBlockRootsIdentical)]
    fn test_non_conflicting_proposals_are_rejected(
        #[case] proposal_data_2: ProposalSignedData,
        #[case] expected: Invalid,
    ) {
        let state = genesis_state(128);
        let mut slashing = proposer_slashing(&state, 3);
        slashing.proposal_signature_2 = sign_proposal(&state, 3, &proposal_data_2);
        slashing.proposal_data_2 = proposal_data_2;

        assert_eq!(
            state.verify_proposer_slashing(&slashing, &BlstBackend),
            Err(Error::Invalid(expected))
        );
    }

    #[test]
    fn test_unknown_proposer_is_rejected() {
        let state = genesis_state(128);
        let mut slashing = proposer_slashing(&state, 3);
        slashing.proposer_index = 1000;

        assert_eq!(
            state.verify_proposer_slashing(&slashing, &BlstBackend),
            Err(Error::Invalid(Invalid::ProposerUnknown(1000)))
        );
    }

    #[test]
    fn test_signature_by_other_validator_is_rejected() {
        let state = genesis_state(128);
        let mut slashing = proposer_slashing(&state, 3);
        slashing.proposal_signature_2 = sign_proposal(&state, 4, &slashing.proposal_data_2);

        assert_eq!(
            state.verify_proposer_slashing(&slashing, &BlstBackend),
            Err(Error::Invalid(Invalid::BadProposal2Signature))
        );
    }
}
