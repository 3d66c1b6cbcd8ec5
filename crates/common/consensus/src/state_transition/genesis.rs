use alloy_primitives::B256;
use ssz_types::{FixedVector, VariableList, typenum::U1099511627776};
use strata_bls::SignatureBackend;
use tracing::info;
use tree_hash::TreeHash;

use crate::{
    beacon_state::BeaconState,
    constants::{
        GENESIS_EPOCH, GENESIS_FORK_VERSION, GENESIS_SLOT, GENESIS_START_SHARD,
        MAX_DEPOSIT_AMOUNT, ZERO_HASH,
    },
    crosslink::Crosslink,
    deposit::Deposit,
    errors::{BlockProcessingError, IntoWithIndex},
    eth_1_data::Eth1Data,
    fork::Fork,
};

/// Build the genesis state from the chain start ``deposits``.
///
/// Deposits are applied in order without verifying their Merkle branches. Deposits with an
/// invalid proof of possession are skipped, and every validator holding at least
/// ``MAX_DEPOSIT_AMOUNT`` is active from ``GENESIS_EPOCH``.
pub fn get_genesis_beacon_state(
    deposits: &[Deposit],
    genesis_time: u64,
    latest_eth1_data: Eth1Data,
    backend: &impl SignatureBackend,
) -> Result<BeaconState, BlockProcessingError> {
    let mut state = BeaconState {
        // Misc
        slot: GENESIS_SLOT,
        genesis_time,
        fork: Fork {
            previous_version: GENESIS_FORK_VERSION,
            current_version: GENESIS_FORK_VERSION,
            epoch: GENESIS_EPOCH,
        },

        // Validator registry
        validator_registry: VariableList::empty(),
        validator_balances: VariableList::empty(),
        validator_registry_update_epoch: GENESIS_EPOCH,

        // Randomness and committees
        latest_randao_mixes: FixedVector::from_elem(ZERO_HASH),
        previous_shuffling_start_shard: GENESIS_START_SHARD,
        current_shuffling_start_shard: GENESIS_START_SHARD,
        previous_shuffling_epoch: GENESIS_EPOCH,
        current_shuffling_epoch: GENESIS_EPOCH,
        previous_shuffling_seed: ZERO_HASH,
        current_shuffling_seed: ZERO_HASH,

        // Finality
        previous_justified_epoch: GENESIS_EPOCH,
        justified_epoch: GENESIS_EPOCH,
        justification_bitfield: 0,
        finalized_epoch: GENESIS_EPOCH,

        // Recent state
        latest_crosslinks: FixedVector::from_elem(Crosslink {
            epoch: GENESIS_EPOCH,
            shard_block_root: ZERO_HASH,
        }),
        latest_block_roots: FixedVector::from_elem(ZERO_HASH),
        latest_active_index_roots: FixedVector::from_elem(ZERO_HASH),
        latest_slashed_balances: FixedVector::from_elem(0),
        latest_attestations: VariableList::empty(),
        batched_block_roots: VariableList::empty(),

        // Ethereum 1.0 chain data
        latest_eth1_data,
        eth1_data_votes: VariableList::empty(),
        deposit_index: 0,
    };

    // Process initial deposits
    for (index, deposit) in deposits.iter().enumerate() {
        state
            .apply_deposit(&deposit.deposit_data, backend)
            .map_err(|err| err.into_with_index(index))?;
    }
    state.deposit_index = deposits.len() as u64;

    // Process initial activations
    for index in 0..state.validator_registry.len() as u64 {
        if state.get_effective_balance(index)? >= MAX_DEPOSIT_AMOUNT {
            state.activate_validator(index, true)?;
        }
    }

    let genesis_active_index_root = genesis_active_index_root(&state);
    state.latest_active_index_roots = FixedVector::from_elem(genesis_active_index_root);
    state.current_shuffling_seed = state.generate_seed(GENESIS_EPOCH);

    info!(
        validators = state.validator_registry.len(),
        active_validators = state.get_active_validator_indices(GENESIS_EPOCH).len(),
        genesis_time,
        "Built genesis state"
    );

    Ok(state)
}

/// Hash tree root of the validator indices active at ``GENESIS_EPOCH``.
fn genesis_active_index_root(state: &BeaconState) -> B256 {
    VariableList::<u64, U1099511627776>::from(state.get_active_validator_indices(GENESIS_EPOCH))
        .tree_hash_root()
}
