use std::cmp::min;

use alloy_primitives::B256;
use ethereum_hashing::hash_fixed;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{
    FixedVector, VariableList,
    serde_utils::{quoted_u64_fixed_vec, quoted_u64_var_list},
    typenum::{U1024, U8192, U16384, U16777216, U1099511627776},
};
use tracing::trace;
use tree_hash_derive::TreeHash;

use crate::{
    constants::{
        GENESIS_EPOCH, LATEST_ACTIVE_INDEX_ROOTS_LENGTH, LATEST_BLOCK_ROOTS_LENGTH,
        LATEST_RANDAO_MIXES_LENGTH, MAX_DEPOSIT_AMOUNT, MIN_SEED_LOOKAHEAD, SHARD_COUNT,
        SLOTS_PER_EPOCH,
    },
    crosslink::Crosslink,
    errors::BeaconStateError,
    eth_1_data::{Eth1Data, Eth1DataVote},
    fork::Fork,
    misc::{
        compute_epoch_at_slot, get_active_validator_indices, get_bitfield_bit,
        get_epoch_committee_count, get_shuffling, int_to_bytes32, is_power_of_two,
    },
    pending_attestation::PendingAttestation,
    validator::Validator,
};

/// A crosslink committee and the shard it is assigned to.
pub type CrosslinkCommittee = (Vec<u64>, u64);

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct BeaconState {
    // Misc
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub genesis_time: u64,
    pub fork: Fork,

    // Validator registry
    pub validator_registry: VariableList<Validator, U1099511627776>,
    #[serde(with = "quoted_u64_var_list")]
    pub validator_balances: VariableList<u64, U1099511627776>,
    #[serde(with = "serde_utils::quoted_u64")]
    pub validator_registry_update_epoch: u64,

    // Randomness and committees
    pub latest_randao_mixes: FixedVector<B256, U8192>,
    #[serde(with = "serde_utils::quoted_u64")]
    pub previous_shuffling_start_shard: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub current_shuffling_start_shard: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub previous_shuffling_epoch: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub current_shuffling_epoch: u64,
    pub previous_shuffling_seed: B256,
    pub current_shuffling_seed: B256,

    // Finality
    #[serde(with = "serde_utils::quoted_u64")]
    pub previous_justified_epoch: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub justified_epoch: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub justification_bitfield: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub finalized_epoch: u64,

    // Recent state
    pub latest_crosslinks: FixedVector<Crosslink, U1024>,
    pub latest_block_roots: FixedVector<B256, U8192>,
    pub latest_active_index_roots: FixedVector<B256, U8192>,
    /// Balances slashed at every withdrawal period
    #[serde(with = "quoted_u64_fixed_vec")]
    pub latest_slashed_balances: FixedVector<u64, U8192>,
    pub latest_attestations: VariableList<PendingAttestation, U16384>,
    pub batched_block_roots: VariableList<B256, U16777216>,

    // Ethereum 1.0 chain data
    pub latest_eth1_data: Eth1Data,
    pub eth1_data_votes: VariableList<Eth1DataVote, U1024>,
    #[serde(with = "serde_utils::quoted_u64")]
    pub deposit_index: u64,
}

impl BeaconState {
    /// Return the current epoch.
    pub fn get_current_epoch(&self) -> u64 {
        compute_epoch_at_slot(self.slot)
    }

    /// Return the previous epoch (unless the current epoch is ``GENESIS_EPOCH``).
    pub fn get_previous_epoch(&self) -> u64 {
        let current_epoch = self.get_current_epoch();
        if current_epoch > GENESIS_EPOCH {
            current_epoch - 1
        } else {
            current_epoch
        }
    }

    pub fn get_validator(&self, index: u64) -> Result<&Validator, BeaconStateError> {
        self.validator_registry
            .get(index as usize)
            .ok_or(BeaconStateError::UnknownValidator(index))
    }

    pub fn get_validator_mut(&mut self, index: u64) -> Result<&mut Validator, BeaconStateError> {
        self.validator_registry
            .get_mut(index as usize)
            .ok_or(BeaconStateError::UnknownValidator(index))
    }

    /// Return the balance at stake for the validator at ``index``.
    pub fn get_effective_balance(&self, index: u64) -> Result<u64, BeaconStateError> {
        self.validator_balances
            .get(index as usize)
            .map(|balance| min(*balance, MAX_DEPOSIT_AMOUNT))
            .ok_or(BeaconStateError::UnknownValidator(index))
    }

    pub fn increase_balance(&mut self, index: u64, delta: u64) -> Result<(), BeaconStateError> {
        let balance = self
            .validator_balances
            .get_mut(index as usize)
            .ok_or(BeaconStateError::UnknownValidator(index))?;
        *balance = balance
            .checked_add(delta)
            .ok_or(BeaconStateError::BalanceOverflow(index))?;
        Ok(())
    }

    /// Decrease the validator balance at index ``index`` by ``delta`` with underflow protection.
    pub fn decrease_balance(&mut self, index: u64, delta: u64) -> Result<(), BeaconStateError> {
        let balance = self
            .validator_balances
            .get_mut(index as usize)
            .ok_or(BeaconStateError::UnknownValidator(index))?;
        *balance = balance.saturating_sub(delta);
        Ok(())
    }

    /// Return the block root at a recent ``slot``.
    pub fn get_block_root(&self, slot: u64) -> Result<B256, BeaconStateError> {
        if slot >= self.slot || self.slot > slot.saturating_add(LATEST_BLOCK_ROOTS_LENGTH) {
            return Err(BeaconStateError::SlotOutOfRange {
                slot,
                state_slot: self.slot,
            });
        }
        Ok(self.latest_block_roots[(slot % LATEST_BLOCK_ROOTS_LENGTH) as usize])
    }

    /// Return the randao mix at a recent ``epoch``.
    pub fn get_randao_mix(&self, epoch: u64) -> B256 {
        self.latest_randao_mixes[(epoch % LATEST_RANDAO_MIXES_LENGTH) as usize]
    }

    /// Return the index root at a recent ``epoch``.
    pub fn get_active_index_root(&self, epoch: u64) -> B256 {
        self.latest_active_index_roots[(epoch % LATEST_ACTIVE_INDEX_ROOTS_LENGTH) as usize]
    }

    /// Generate a seed for the given ``epoch``.
    pub fn generate_seed(&self, epoch: u64) -> B256 {
        let input = [
            self.get_randao_mix(epoch.saturating_sub(MIN_SEED_LOOKAHEAD))
                .as_slice(),
            self.get_active_index_root(epoch).as_slice(),
            int_to_bytes32(epoch).as_slice(),
        ]
        .concat();
        B256::from(hash_fixed(&input))
    }

    pub fn get_active_validator_indices(&self, epoch: u64) -> Vec<u64> {
        get_active_validator_indices(&self.validator_registry, epoch)
    }

    /// Return the signature domain of ``domain_type`` at ``epoch``.
    pub fn get_domain(&self, epoch: u64, domain_type: u64) -> u64 {
        self.fork.get_domain(epoch, domain_type)
    }

    pub fn get_previous_epoch_committee_count(&self) -> u64 {
        get_epoch_committee_count(
            self.get_active_validator_indices(self.previous_shuffling_epoch)
                .len() as u64,
        )
    }

    pub fn get_current_epoch_committee_count(&self) -> u64 {
        get_epoch_committee_count(
            self.get_active_validator_indices(self.current_shuffling_epoch)
                .len() as u64,
        )
    }

    pub fn get_next_epoch_committee_count(&self) -> u64 {
        get_epoch_committee_count(
            self.get_active_validator_indices(self.get_current_epoch() + 1)
                .len() as u64,
        )
    }

    /// Return the list of ``(committee, shard)`` tuples for the ``slot``.
    ///
    /// ``registry_change`` only matters for slots of the next epoch and selects the shuffling that
    /// a registry update at the end of the current epoch would produce.
    pub fn get_crosslink_committees_at_slot(
        &self,
        slot: u64,
        registry_change: bool,
    ) -> Result<Vec<CrosslinkCommittee>, BeaconStateError> {
        let epoch = compute_epoch_at_slot(slot);
        let current_epoch = self.get_current_epoch();
        let previous_epoch = self.get_previous_epoch();
        let next_epoch = current_epoch + 1;

        let (committees_per_epoch, seed, shuffling_epoch, shuffling_start_shard) =
            if epoch == current_epoch {
                (
                    self.get_current_epoch_committee_count(),
                    self.current_shuffling_seed,
                    self.current_shuffling_epoch,
                    self.current_shuffling_start_shard,
                )
            } else if epoch == previous_epoch {
                (
                    self.get_previous_epoch_committee_count(),
                    self.previous_shuffling_seed,
                    self.previous_shuffling_epoch,
                    self.previous_shuffling_start_shard,
                )
            } else if epoch == next_epoch {
                let current_committees_per_epoch = self.get_current_epoch_committee_count();
                let epochs_since_last_registry_update =
                    current_epoch.saturating_sub(self.validator_registry_update_epoch);
                let (seed, shuffling_start_shard) = if registry_change {
                    (
                        self.generate_seed(next_epoch),
                        (self.current_shuffling_start_shard + current_committees_per_epoch)
                            % SHARD_COUNT,
                    )
                } else if epochs_since_last_registry_update > 1
                    && is_power_of_two(epochs_since_last_registry_update)
                {
                    (
                        self.generate_seed(next_epoch),
                        self.current_shuffling_start_shard,
                    )
                } else {
                    (
                        self.current_shuffling_seed,
                        self.current_shuffling_start_shard,
                    )
                };
                (
                    self.get_next_epoch_committee_count(),
                    seed,
                    next_epoch,
                    shuffling_start_shard,
                )
            } else {
                return Err(BeaconStateError::EpochOutOfRange {
                    epoch,
                    previous_epoch,
                    next_epoch,
                });
            };

        let shuffling = get_shuffling(seed, &self.validator_registry, shuffling_epoch)?;
        let offset = slot % SLOTS_PER_EPOCH;
        let committees_per_slot = committees_per_epoch / SLOTS_PER_EPOCH;
        let slot_start_shard =
            (shuffling_start_shard + committees_per_slot * offset) % SHARD_COUNT;
        trace!(
            slot,
            shuffling_epoch,
            committees_per_slot,
            slot_start_shard,
            "Derived crosslink committees"
        );

        Ok((0..committees_per_slot)
            .map(|i| {
                (
                    shuffling
                        .get((committees_per_slot * offset + i) as usize)
                        .cloned()
                        .unwrap_or_default(),
                    (slot_start_shard + i) % SHARD_COUNT,
                )
            })
            .collect())
    }

    /// Return the committee attesting to ``shard`` at ``slot``, if any.
    pub fn get_crosslink_committee_for_shard(
        &self,
        slot: u64,
        shard: u64,
    ) -> Result<Option<Vec<u64>>, BeaconStateError> {
        Ok(self
            .get_crosslink_committees_at_slot(slot, false)?
            .into_iter()
            .find(|(_, committee_shard)| *committee_shard == shard)
            .map(|(committee, _)| committee))
    }

    /// Return the beacon proposer index for the ``slot``.
    pub fn get_beacon_proposer_index(&self, slot: u64) -> Result<u64, BeaconStateError> {
        let committees = self.get_crosslink_committees_at_slot(slot, false)?;
        let Some((first_committee, _)) = committees.first() else {
            return Err(BeaconStateError::EmptyCommittee(slot));
        };
        if first_committee.is_empty() {
            return Err(BeaconStateError::EmptyCommittee(slot));
        }
        Ok(first_committee[(slot % first_committee.len() as u64) as usize])
    }
}

/// Return the members of ``committee`` whose bit is set in ``bitfield``.
pub fn get_participants(committee: &[u64], bitfield: &[u8]) -> Vec<u64> {
    committee
        .iter()
        .enumerate()
        .filter(|(seat, _)| get_bitfield_bit(bitfield, *seat) == 1)
        .map(|(_, validator_index)| *validator_index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constants::GENESIS_SLOT, test_utils::genesis_state};

    #[test]
    fn test_committees_cover_active_validators_once_per_epoch() {
        let state = genesis_state(128);

        let mut members: Vec<u64> = vec![];
        for slot in GENESIS_SLOT..GENESIS_SLOT + SLOTS_PER_EPOCH {
            let committees = state.get_crosslink_committees_at_slot(slot, false).unwrap();
            assert_eq!(committees.len(), 1);
            let (committee, shard) = &committees[0];
            assert_eq!(committee.len(), 2);
            assert_eq!(*shard, slot - GENESIS_SLOT);
            members.extend(committee);
        }
        members.sort();

        assert_eq!(members, (0..128).collect::<Vec<_>>());
    }

    #[test]
    fn test_proposer_comes_from_first_committee() {
        let state = genesis_state(128);
        let slot = GENESIS_SLOT + 5;

        let (committee, _) = state
            .get_crosslink_committees_at_slot(slot, false)
            .unwrap()
            .remove(0);

        assert_eq!(
            state.get_beacon_proposer_index(slot).unwrap(),
            committee[(slot % committee.len() as u64) as usize]
        );
    }

    #[test]
    fn test_small_registry_leaves_empty_committees() {
        let state = genesis_state(10);

        let proposers = (GENESIS_SLOT..GENESIS_SLOT + SLOTS_PER_EPOCH)
            .map(|slot| state.get_beacon_proposer_index(slot))
            .collect::<Vec<_>>();

        assert_eq!(proposers.iter().filter(|result| result.is_ok()).count(), 10);
        assert!(
            proposers
                .iter()
                .filter(|result| result.is_err())
                .all(|result| matches!(result, Err(BeaconStateError::EmptyCommittee(_))))
        );
    }

    #[test]
    fn test_committees_outside_lookahead_are_an_error() {
        let state = genesis_state(128);
        let slot = GENESIS_SLOT + 2 * SLOTS_PER_EPOCH;

        assert_eq!(
            state.get_crosslink_committees_at_slot(slot, false),
            Err(BeaconStateError::EpochOutOfRange {
                epoch: GENESIS_EPOCH + 2,
                previous_epoch: GENESIS_EPOCH,
                next_epoch: GENESIS_EPOCH + 1,
            })
        );
        assert!(
            state
                .get_crosslink_committees_at_slot(GENESIS_SLOT + SLOTS_PER_EPOCH, true)
                .is_ok()
        );
    }

    #[test]
    fn test_block_root_range() {
        let mut state = genesis_state(1);
        state.slot = GENESIS_SLOT + LATEST_BLOCK_ROOTS_LENGTH + 1;

        assert!(state.get_block_root(GENESIS_SLOT).is_err());
        assert!(state.get_block_root(GENESIS_SLOT + 1).is_ok());
        assert_eq!(
            state.get_block_root(state.slot),
            Err(BeaconStateError::SlotOutOfRange {
                slot: state.slot,
                state_slot: state.slot
            })
        );
    }

    #[test]
    fn test_effective_balance_is_capped() {
        let mut state = genesis_state(1);
        state.increase_balance(0, 5).unwrap();

        assert_eq!(state.validator_balances[0], MAX_DEPOSIT_AMOUNT + 5);
        assert_eq!(state.get_effective_balance(0), Ok(MAX_DEPOSIT_AMOUNT));
        assert_eq!(
            state.increase_balance(0, u64::MAX),
            Err(BeaconStateError::BalanceOverflow(0))
        );
    }
}
