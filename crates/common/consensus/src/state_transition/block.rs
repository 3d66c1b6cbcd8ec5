use strata_bls::SignatureBackend;
use tracing::{debug, warn};
use tree_hash::TreeHash;

use crate::{
    beacon_block::BeaconBlock,
    beacon_state::BeaconState,
    errors::{BlockInvalid, BlockProcessingError},
};

impl BeaconState {
    /// Apply ``block`` to a state already advanced to ``block.slot``.
    ///
    /// The state is left partially updated when an error is returned; use [state_transition] to
    /// keep the input state intact.
    pub fn process_block(
        &mut self,
        block: &BeaconBlock,
        backend: &impl SignatureBackend,
    ) -> Result<(), BlockProcessingError> {
        if block.slot != self.slot {
            return Err(BlockInvalid::StateSlotMismatch {
                state: self.slot,
                block: block.slot,
            }
            .into());
        }

        self.verify_block_signature(block, backend)?;
        self.process_randao(&block.randao_reveal, backend)?;
        self.process_eth1_data(&block.eth1_data)?;
        self.process_proposer_slashings(&block.body.proposer_slashings, backend)?;
        self.process_attestations(&block.body.attestations, backend)?;
        self.process_deposits(&block.body.deposits, backend)?;

        debug!(
            slot = block.slot,
            proposer_slashings = block.body.proposer_slashings.len(),
            attestations = block.body.attestations.len(),
            deposits = block.body.deposits.len(),
            "Processed block"
        );
        Ok(())
    }
}

/// Apply ``block`` to a copy of ``pre_state`` and return the resulting state.
///
/// Slots skipped between ``pre_state`` and ``block`` are advanced with ``block.parent_root`` as the
/// latest block root. With ``verify_state_root`` the block's claimed state root must match the
/// post-state.
pub fn state_transition(
    pre_state: &BeaconState,
    block: &BeaconBlock,
    backend: &impl SignatureBackend,
    verify_state_root: bool,
) -> Result<BeaconState, BlockProcessingError> {
    let mut state = pre_state.clone();

    if let Err(err) = apply_block(&mut state, block, backend, verify_state_root) {
        warn!(
            slot = block.slot,
            category = ?err.category(),
            "Rejected block: {err}"
        );
        return Err(err);
    }

    Ok(state)
}

fn apply_block(
    state: &mut BeaconState,
    block: &BeaconBlock,
    backend: &impl SignatureBackend,
    verify_state_root: bool,
) -> Result<(), BlockProcessingError> {
    while state.slot < block.slot {
        state.advance_slot(block.parent_root)?;
    }
    state.process_block(block, backend)?;

    if verify_state_root {
        let computed = state.tree_hash_root();
        if block.state_root != computed {
            return Err(BlockInvalid::StateRootMismatch {
                block: block.state_root,
                computed,
            }
            .into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;
    use strata_bls::BlstBackend;
    use tracing_test::traced_test;

    use super::*;
    use crate::{
        beacon_block::BeaconBlockBody,
        constants::{DOMAIN_RANDAO, GENESIS_SLOT, LATEST_RANDAO_MIXES_LENGTH},
        errors::ErrorCategory,
        test_utils::{empty_block, genesis_state, private_key, sign_block, signed_block},
    };

    #[test]
    fn test_state_transition_applies_empty_block() {
        let pre_state = genesis_state(128);
        let block = signed_block(&pre_state, GENESIS_SLOT + 2, BeaconBlockBody::default());

        let post_state = state_transition(&pre_state, &block, &BlstBackend, true).unwrap();

        assert_eq!(post_state.slot, GENESIS_SLOT + 2);
        assert_eq!(post_state.tree_hash_root(), block.state_root);
        assert_eq!(
            post_state.latest_block_roots[(GENESIS_SLOT % 8192) as usize],
            block.parent_root
        );
        assert_eq!(post_state.eth1_data_votes.len(), 1);
        let epoch = post_state.get_current_epoch();
        assert_ne!(
            post_state.latest_randao_mixes[(epoch % LATEST_RANDAO_MIXES_LENGTH) as usize],
            pre_state.latest_randao_mixes[(epoch % LATEST_RANDAO_MIXES_LENGTH) as usize]
        );
    }

    #[test]
    #[traced_test]
    fn test_rejected_block_leaves_pre_state_untouched() {
        let pre_state = genesis_state(128);
        let pre_root = pre_state.tree_hash_root();
        let mut block = signed_block(&pre_state, GENESIS_SLOT + 1, BeaconBlockBody::default());
        block.parent_root = B256::repeat_byte(0xbb);

        let err = state_transition(&pre_state, &block, &BlstBackend, true).unwrap_err();

        assert_eq!(err, BlockProcessingError::Invalid(BlockInvalid::BadSignature));
        assert_eq!(err.category(), ErrorCategory::Signature);
        assert_eq!(pre_state.tree_hash_root(), pre_root);
        assert!(logs_contain("Rejected block"));
    }

    #[test]
    fn test_block_for_past_slot_is_rejected() {
        let mut state = genesis_state(128);
        let block = empty_block(&state);
        state.advance_slot(B256::ZERO).unwrap();

        assert_eq!(
            state.process_block(&block, &BlstBackend),
            Err(BlockProcessingError::Invalid(
                BlockInvalid::StateSlotMismatch {
                    state: GENESIS_SLOT + 1,
                    block: GENESIS_SLOT
                }
            ))
        );
    }

    #[test]
    fn test_state_root_mismatch_is_rejected() {
        let pre_state = genesis_state(128);
        let mut advanced = pre_state.clone();
        advanced.advance_slot(B256::ZERO).unwrap();
        let mut block = BeaconBlock {
            state_root: B256::repeat_byte(1),
            ..empty_block(&advanced)
        };
        sign_block(&advanced, &mut block);

        assert!(state_transition(&pre_state, &block, &BlstBackend, false).is_ok());
        assert!(matches!(
            state_transition(&pre_state, &block, &BlstBackend, true),
            Err(BlockProcessingError::Invalid(
                BlockInvalid::StateRootMismatch { .. }
            ))
        ));
    }

    #[test]
    fn test_bad_randao_reveal_is_rejected() {
        let mut state = genesis_state(128);
        state.advance_slot(B256::ZERO).unwrap();
        let mut block = empty_block(&state);
        let next_epoch = state.get_current_epoch() + 1;
        block.randao_reveal = BlstBackend
            .sign(
                &private_key(state.get_beacon_proposer_index(state.slot).unwrap()),
                next_epoch.tree_hash_root(),
                state.get_domain(next_epoch, DOMAIN_RANDAO),
            )
            .unwrap();
        sign_block(&state, &mut block);

        assert_eq!(
            state.process_block(&block, &BlstBackend),
            Err(BlockProcessingError::Invalid(
                BlockInvalid::BadRandaoSignature
            ))
        );
    }
}
