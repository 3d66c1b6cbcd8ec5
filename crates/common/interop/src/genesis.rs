use alloy_primitives::B256;
use strata_bls::SignatureBackend;
use strata_consensus::{beacon_state::BeaconState, state_transition::get_genesis_beacon_state};

use crate::{deposits::interop_deposits, keypairs::Keypair};

/// Genesis state in which validator ``i`` is funded by, and holds, ``keypairs[i]``.
pub fn interop_genesis_state(
    keypairs: &[Keypair],
    genesis_time: u64,
    eth1_block_hash: B256,
    backend: &impl SignatureBackend,
) -> anyhow::Result<BeaconState> {
    let (deposits, eth1_data) =
        interop_deposits(keypairs, genesis_time, eth1_block_hash, backend)?;
    Ok(get_genesis_beacon_state(
        &deposits,
        genesis_time,
        eth1_data,
        backend,
    )?)
}

#[cfg(test)]
mod tests {
    use strata_bls::BlstBackend;
    use strata_consensus::constants::{GENESIS_EPOCH, MAX_DEPOSIT_AMOUNT};

    use super::*;
    use crate::keypairs::generate_deterministic_keypairs;

    #[test]
    fn test_interop_genesis_activates_every_keypair() {
        let keypairs = generate_deterministic_keypairs(16).unwrap();
        let state =
            interop_genesis_state(&keypairs, 1_578_009_600, B256::repeat_byte(1), &BlstBackend)
                .unwrap();

        assert_eq!(state.genesis_time, 1_578_009_600);
        assert_eq!(state.deposit_index, 16);
        assert_eq!(state.latest_eth1_data.block_hash, B256::repeat_byte(1));
        for (validator, keypair) in state.validator_registry.iter().zip(&keypairs) {
            assert_eq!(validator.pubkey, keypair.public_key);
            assert_eq!(validator.activation_epoch, GENESIS_EPOCH);
        }
        assert!(
            state
                .validator_balances
                .iter()
                .all(|balance| *balance == MAX_DEPOSIT_AMOUNT)
        );
    }
}
