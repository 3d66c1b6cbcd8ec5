use std::cmp::{max, min};

use alloy_primitives::B256;
use ethereum_hashing::hash;

use crate::{
    constants::{
        ACTIVATION_EXIT_DELAY, SHARD_COUNT, SHUFFLE_ROUND_COUNT, SLOTS_PER_EPOCH,
        TARGET_COMMITTEE_SIZE,
    },
    errors::BeaconStateError,
    validator::Validator,
};

pub fn compute_shuffled_index(
    mut index: usize,
    index_count: usize,
    seed: B256,
) -> Result<usize, BeaconStateError> {
    if index >= index_count {
        return Err(BeaconStateError::ShuffleIndexOutOfBounds { index, index_count });
    }
    for round in 0..SHUFFLE_ROUND_COUNT {
        let seed_with_round = [seed.as_slice(), &round.to_le_bytes()].concat();
        let pivot = bytes_to_int64(&hash(&seed_with_round)[..]) % index_count as u64;

        let flip = (pivot as usize + (index_count - index)) % index_count;
        let position = max(index, flip);
        let seed_with_position = [
            seed_with_round.as_slice(),
            &(position / 256).to_le_bytes()[0..4],
        ]
        .concat();
        let source = hash(&seed_with_position);
        let byte = source[(position % 256) / 8];
        let bit = (byte >> (position % 8)) % 2;

        index = if bit == 1 { flip } else { index };
    }
    Ok(index)
}

// Return the integer deserialization of ``data`` interpreted as little-endian.
pub fn bytes_to_int64(slice: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    let len = slice.len().min(8);
    bytes[..len].copy_from_slice(&slice[..len]);
    u64::from_le_bytes(bytes)
}

/// Return ``value`` as a 32 byte little-endian word.
pub fn int_to_bytes32(value: u64) -> B256 {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&value.to_le_bytes());
    B256::from(bytes)
}

pub fn xor(bytes_1: &[u8], bytes_2: &[u8]) -> B256 {
    let mut result = [0u8; 32];
    for (i, (a, b)) in bytes_1.iter().zip(bytes_2.iter()).take(32).enumerate() {
        result[i] = a ^ b;
    }
    B256::from(result)
}

/// Return the epoch number at ``slot``.
pub fn compute_epoch_at_slot(slot: u64) -> u64 {
    slot / SLOTS_PER_EPOCH
}

/// Return the start slot of ``epoch``. Saturates for ``FAR_FUTURE_EPOCH``.
pub fn compute_start_slot_at_epoch(epoch: u64) -> u64 {
    epoch.saturating_mul(SLOTS_PER_EPOCH)
}

/// Return the epoch at which an activation or exit triggered in ``epoch`` takes effect.
pub fn get_entry_exit_effect_epoch(epoch: u64) -> u64 {
    epoch + 1 + ACTIVATION_EXIT_DELAY
}

pub fn is_power_of_two(value: u64) -> bool {
    value.is_power_of_two()
}

/// Return the number of committees in one epoch for ``active_validator_count`` validators.
pub fn get_epoch_committee_count(active_validator_count: u64) -> u64 {
    max(
        1,
        min(
            SHARD_COUNT / SLOTS_PER_EPOCH,
            active_validator_count / SLOTS_PER_EPOCH / TARGET_COMMITTEE_SIZE,
        ),
    ) * SLOTS_PER_EPOCH
}

/// Split ``values`` into ``split_count`` pieces whose lengths differ by at most one.
pub fn split<T: Clone>(values: &[T], split_count: usize) -> Vec<Vec<T>> {
    let length = values.len();
    (0..split_count)
        .map(|i| values[length * i / split_count..length * (i + 1) / split_count].to_vec())
        .collect()
}

/// Return the indices of validators active at ``epoch``.
pub fn get_active_validator_indices(validators: &[Validator], epoch: u64) -> Vec<u64> {
    validators
        .iter()
        .enumerate()
        .filter(|(_, validator)| validator.is_active_validator(epoch))
        .map(|(index, _)| index as u64)
        .collect()
}

/// Shuffle the validators active at ``epoch`` and split them into crosslink committees.
pub fn get_shuffling(
    seed: B256,
    validators: &[Validator],
    epoch: u64,
) -> Result<Vec<Vec<u64>>, BeaconStateError> {
    let active_validator_indices = get_active_validator_indices(validators, epoch);
    let committees_per_epoch = get_epoch_committee_count(active_validator_indices.len() as u64);
    let seed = xor(seed.as_slice(), int_to_bytes32(epoch).as_slice());

    let shuffled_active_validator_indices = (0..active_validator_indices.len())
        .map(|i| {
            compute_shuffled_index(i, active_validator_indices.len(), seed)
                .map(|shuffled_index| active_validator_indices[shuffled_index])
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(split(
        &shuffled_active_validator_indices,
        committees_per_epoch as usize,
    ))
}

/// Return bit ``index`` of ``bitfield``, reading each byte from its least significant bit.
///
/// Bits past the end of the bitfield read as zero.
pub fn get_bitfield_bit(bitfield: &[u8], index: usize) -> u8 {
    bitfield
        .get(index / 8)
        .map_or(0, |byte| (byte >> (index % 8)) & 1)
}

/// Check that ``bitfield`` is exactly long enough for ``committee_size`` seats and that no bit past
/// the last seat is set.
pub fn verify_bitfield(bitfield: &[u8], committee_size: usize) -> bool {
    if bitfield.len() != committee_size.div_ceil(8) {
        return false;
    }

    (committee_size..bitfield.len() * 8).all(|index| get_bitfield_bit(bitfield, index) == 0)
}
