use alloy_primitives::B256;
use anyhow::anyhow;
use strata_bls::{BLSSignature, SignatureBackend};
use strata_consensus::{
    attestation::Attestation,
    attestation_data::AttestationData,
    attestation_data_and_custody_bit::AttestationDataAndCustodyBit,
    beacon_state::BeaconState,
    constants::{DOMAIN_ATTESTATION, ZERO_HASH},
    misc::{compute_epoch_at_slot, compute_start_slot_at_epoch},
};
use tree_hash::TreeHash;

use crate::keypairs::Keypair;

/// An attestation signed by every member of the first committee at ``slot``, voting for
/// ``beacon_block_root`` and the justified checkpoint ``state`` expects.
pub fn build_attestation(
    state: &BeaconState,
    slot: u64,
    beacon_block_root: B256,
    keypairs: &[Keypair],
    backend: &impl SignatureBackend,
) -> anyhow::Result<Attestation> {
    let (committee, shard) = state
        .get_crosslink_committees_at_slot(slot, false)?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No committee at slot {slot}"))?;

    let justified_epoch = if compute_epoch_at_slot(slot + 1) >= state.get_current_epoch() {
        state.justified_epoch
    } else {
        state.previous_justified_epoch
    };
    let epoch_boundary_slot = compute_start_slot_at_epoch(compute_epoch_at_slot(slot));
    let data = AttestationData {
        slot,
        shard,
        beacon_block_root,
        epoch_boundary_root: state
            .get_block_root(epoch_boundary_slot)
            .unwrap_or(beacon_block_root),
        shard_block_root: ZERO_HASH,
        latest_crosslink: state
            .latest_crosslinks
            .get(shard as usize)
            .copied()
            .ok_or_else(|| anyhow!("No crosslink for shard {shard}"))?,
        justified_epoch,
        justified_block_root: state
            .get_block_root(compute_start_slot_at_epoch(justified_epoch))?,
    };

    let message = AttestationDataAndCustodyBit {
        data: data.clone(),
        custody_bit: false,
    }
    .tree_hash_root();
    let domain = state.get_domain(compute_epoch_at_slot(slot), DOMAIN_ATTESTATION);
    let signatures = committee
        .iter()
        .map(|index| {
            let keypair = keypairs
                .get(*index as usize)
                .ok_or_else(|| anyhow!("No keypair for validator {index}"))?;
            Ok(backend.sign(&keypair.private_key, message, domain)?)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let aggregate_signature = BLSSignature::aggregate(&signatures.iter().collect::<Vec<_>>())?;

    let mut aggregation_bitfield = vec![0u8; committee.len().div_ceil(8)];
    for seat in 0..committee.len() {
        aggregation_bitfield[seat / 8] |= 1 << (seat % 8);
    }

    Ok(Attestation {
        custody_bitfield: vec![0u8; aggregation_bitfield.len()].into(),
        aggregation_bitfield: aggregation_bitfield.into(),
        data,
        aggregate_signature,
    })
}
