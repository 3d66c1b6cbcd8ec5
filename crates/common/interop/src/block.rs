use alloy_primitives::B256;
use anyhow::{anyhow, ensure};
use strata_bls::{BLSSignature, SignatureBackend};
use strata_consensus::{
    beacon_block::{BeaconBlock, BeaconBlockBody},
    beacon_state::BeaconState,
    constants::{DOMAIN_PROPOSAL, DOMAIN_RANDAO},
    state_transition::state_transition,
};
use tracing::debug;
use tree_hash::TreeHash;

use crate::keypairs::Keypair;

/// Keypair of the proposer for the current slot of ``state``.
fn proposer_keypair<'a>(
    state: &BeaconState,
    keypairs: &'a [Keypair],
) -> anyhow::Result<&'a Keypair> {
    let proposer_index = state.get_beacon_proposer_index(state.slot)?;
    keypairs
        .get(proposer_index as usize)
        .ok_or_else(|| anyhow!("No keypair for proposer {proposer_index}"))
}

/// The proposer's RANDAO reveal for the current epoch of ``state``.
pub fn randao_reveal(
    state: &BeaconState,
    keypairs: &[Keypair],
    backend: &impl SignatureBackend,
) -> anyhow::Result<BLSSignature> {
    let epoch = state.get_current_epoch();
    Ok(backend.sign(
        &proposer_keypair(state, keypairs)?.private_key,
        epoch.tree_hash_root(),
        state.get_domain(epoch, DOMAIN_RANDAO),
    )?)
}

/// An unsigned block without operations for the current slot of ``state``.
pub fn empty_block(state: &BeaconState, parent_root: B256) -> BeaconBlock {
    BeaconBlock {
        slot: state.slot,
        parent_root,
        state_root: B256::ZERO,
        randao_reveal: BLSSignature::empty(),
        eth1_data: state.latest_eth1_data.clone(),
        body: BeaconBlockBody::default(),
        signature: BLSSignature::empty(),
    }
}

/// Sign ``block`` as the proposer of the current slot of ``state``.
pub fn sign_block(
    state: &BeaconState,
    block: &mut BeaconBlock,
    keypairs: &[Keypair],
    backend: &impl SignatureBackend,
) -> anyhow::Result<()> {
    block.signature = backend.sign(
        &proposer_keypair(state, keypairs)?.private_key,
        state.block_proposal(block).tree_hash_root(),
        state.get_domain(state.get_current_epoch(), DOMAIN_PROPOSAL),
    )?;
    Ok(())
}

/// Produce a fully signed block at ``slot`` on top of ``pre_state``.
///
/// The block carries a valid RANDAO reveal and the root of the state it transitions to.
pub fn produce_block(
    pre_state: &BeaconState,
    slot: u64,
    parent_root: B256,
    body: BeaconBlockBody,
    keypairs: &[Keypair],
    backend: &impl SignatureBackend,
) -> anyhow::Result<BeaconBlock> {
    ensure!(
        slot >= pre_state.slot,
        "Cannot produce a block for slot {slot} on a state at slot {}",
        pre_state.slot
    );

    let mut state = pre_state.clone();
    while state.slot < slot {
        state.advance_slot(parent_root)?;
    }

    let mut block = BeaconBlock {
        randao_reveal: randao_reveal(&state, keypairs, backend)?,
        body,
        ..empty_block(&state, parent_root)
    };
    // The post-state does not depend on the proposal signature, only on its validity.
    sign_block(&state, &mut block, keypairs, backend)?;
    block.state_root = state_transition(pre_state, &block, backend, false)?.tree_hash_root();
    sign_block(&state, &mut block, keypairs, backend)?;
    debug!(slot, state_root = %block.state_root, "Produced block");

    Ok(block)
}

#[cfg(test)]
mod tests {
    use strata_bls::BlstBackend;
    use strata_consensus::constants::GENESIS_SLOT;

    use super::*;
    use crate::{genesis::interop_genesis_state, keypairs::generate_deterministic_keypairs};

    fn genesis() -> (BeaconState, Vec<Keypair>) {
        let keypairs = generate_deterministic_keypairs(128).unwrap();
        let state = interop_genesis_state(&keypairs, 0, B256::ZERO, &BlstBackend).unwrap();
        (state, keypairs)
    }

    #[test]
    fn test_produced_block_passes_state_transition() {
        let (state, keypairs) = genesis();
        let block = produce_block(
            &state,
            GENESIS_SLOT + 3,
            B256::repeat_byte(4),
            BeaconBlockBody::default(),
            &keypairs,
            &BlstBackend,
        )
        .unwrap();

        let post_state = state_transition(&state, &block, &BlstBackend, true).unwrap();
        assert_eq!(post_state.slot, GENESIS_SLOT + 3);
        assert_eq!(post_state.tree_hash_root(), block.state_root);
    }

    #[test]
    fn test_block_for_past_slot_is_refused() {
        let (mut state, keypairs) = genesis();
        state.slot += 2;

        assert!(
            produce_block(
                &state,
                GENESIS_SLOT,
                B256::ZERO,
                BeaconBlockBody::default(),
                &keypairs,
                &BlstBackend,
            )
            .is_err()
        );
    }

    #[test]
    fn test_missing_proposer_keypair_is_an_error() {
        let (state, keypairs) = genesis();

        assert!(randao_reveal(&state, &keypairs[..0], &BlstBackend).is_err());
    }
}
