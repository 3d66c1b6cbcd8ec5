use strata_bls::{PubKey, SignatureBackend};
use tracing::debug;
use tree_hash::TreeHash;

use crate::{
    attestation::{Attestation, Bitfield},
    attestation_data::AttestationData,
    attestation_data_and_custody_bit::AttestationDataAndCustodyBit,
    beacon_state::{BeaconState, get_participants},
    constants::{
        DOMAIN_ATTESTATION, MIN_ATTESTATION_INCLUSION_DELAY, SLOTS_PER_EPOCH, ZERO_HASH,
    },
    crosslink::Crosslink,
    errors::{
        AttestationInvalid as Invalid, AttestationValidationError as Error, BlockProcessingError,
        IntoWithIndex,
    },
    misc::{compute_epoch_at_slot, compute_start_slot_at_epoch, get_bitfield_bit, verify_bitfield},
    pending_attestation::PendingAttestation,
};

impl BeaconState {
    /// Return the committee assigned to the shard and slot of ``data``.
    fn get_attestation_committee(&self, data: &AttestationData) -> Result<Vec<u64>, Error> {
        match self.get_crosslink_committee_for_shard(data.slot, data.shard)? {
            Some(committee) => Ok(committee),
            None => Err(Error::Invalid(Invalid::NoCommitteeForShard {
                shard: data.shard,
                slot: data.slot,
            })),
        }
    }

    /// Return the participant indices for the ``data`` and ``bitfield``.
    pub fn get_attestation_participants(
        &self,
        data: &AttestationData,
        bitfield: &Bitfield,
    ) -> Result<Vec<u64>, Error> {
        let committee = self.get_attestation_committee(data)?;
        verify!(
            verify_bitfield(bitfield, committee.len()),
            Invalid::BadAggregationBitfieldLength {
                committee_size: committee.len(),
            }
        );
        Ok(get_participants(&committee, bitfield))
    }

    /// Check ``attestation`` against the state without changing it.
    pub fn validate_attestation(
        &self,
        attestation: &Attestation,
        backend: &impl SignatureBackend,
    ) -> Result<(), Error> {
        let data = &attestation.data;

        verify!(
            data.slot.saturating_add(MIN_ATTESTATION_INCLUSION_DELAY) <= self.slot,
            Invalid::IncludedTooEarly {
                state: self.slot,
                attestation: data.slot,
            }
        );
        verify!(
            self.slot
                < data
                    .slot
                    .saturating_add(MIN_ATTESTATION_INCLUSION_DELAY + SLOTS_PER_EPOCH),
            Invalid::IncludedTooLate {
                state: self.slot,
                attestation: data.slot,
            }
        );

        // Verify the justified epoch and root is correct.
        let justified_epoch =
            if compute_epoch_at_slot(data.slot.saturating_add(1)) >= self.get_current_epoch() {
                self.justified_epoch
            } else {
                self.previous_justified_epoch
            };
        verify!(
            data.justified_epoch == justified_epoch,
            Invalid::WrongJustifiedEpoch {
                state: justified_epoch,
                attestation: data.justified_epoch,
            }
        );
        let justified_block_root =
            self.get_block_root(compute_start_slot_at_epoch(data.justified_epoch))?;
        verify!(
            data.justified_block_root == justified_block_root,
            Invalid::WrongJustifiedRoot {
                state: justified_block_root,
                attestation: data.justified_block_root,
            }
        );

        let latest_crosslink = self
            .latest_crosslinks
            .get(data.shard as usize)
            .ok_or(Error::Invalid(Invalid::BadLatestCrosslinkRoot))?;
        let candidate_crosslink = Crosslink {
            epoch: compute_epoch_at_slot(data.slot),
            shard_block_root: data.shard_block_root,
        };
        verify!(
            *latest_crosslink == data.latest_crosslink || *latest_crosslink == candidate_crosslink,
            Invalid::BadLatestCrosslinkRoot
        );

        verify!(
            attestation.custody_bitfield.iter().all(|byte| *byte == 0),
            Invalid::CustodyBitfieldHasSetBits
        );
        verify!(
            attestation.aggregation_bitfield.iter().any(|byte| *byte != 0),
            Invalid::AggregationBitfieldIsEmpty
        );

        let committee = self.get_attestation_committee(data)?;
        verify!(
            verify_bitfield(&attestation.aggregation_bitfield, committee.len()),
            Invalid::BadAggregationBitfieldLength {
                committee_size: committee.len(),
            }
        );
        verify!(
            verify_bitfield(&attestation.custody_bitfield, committee.len()),
            Invalid::BadCustodyBitfieldLength {
                committee_size: committee.len(),
            }
        );
        for seat in 0..committee.len() {
            if get_bitfield_bit(&attestation.aggregation_bitfield, seat) == 0 {
                verify!(
                    get_bitfield_bit(&attestation.custody_bitfield, seat) == 0,
                    Invalid::CustodyBitWithoutAggregationBit(seat)
                );
            }
        }

        verify!(
            self.verify_attestation_signature(attestation, &committee, backend)?,
            Invalid::BadSignature
        );

        verify!(
            data.shard_block_root == ZERO_HASH,
            Invalid::ShardBlockRootNotZero
        );

        Ok(())
    }

    /// Verify the aggregate signature of ``attestation`` against the keys of its participants,
    /// split by custody bit.
    fn verify_attestation_signature(
        &self,
        attestation: &Attestation,
        committee: &[u64],
        backend: &impl SignatureBackend,
    ) -> Result<bool, Error> {
        let participants = get_participants(committee, &attestation.aggregation_bitfield);
        let custody_bit_1_participants = get_participants(committee, &attestation.custody_bitfield);
        let custody_bit_0_participants = participants
            .iter()
            .filter(|index| !custody_bit_1_participants.contains(index))
            .copied()
            .collect::<Vec<_>>();

        let mut pubkeys = vec![];
        let mut messages = vec![];
        for (custody_bit, custody_participants) in [
            (false, &custody_bit_0_participants),
            (true, &custody_bit_1_participants),
        ] {
            if custody_participants.is_empty() {
                continue;
            }
            let participant_pubkeys = custody_participants
                .iter()
                .map(|index| {
                    self.get_validator(*index)
                        .map(|validator| &validator.pubkey)
                })
                .collect::<Result<Vec<&PubKey>, _>>()?;
            pubkeys.push(
                backend
                    .aggregate_pubkeys(&participant_pubkeys)
                    .map_err(|err| Error::BeaconState(err.into()))?,
            );
            messages.push(
                AttestationDataAndCustodyBit {
                    data: attestation.data.clone(),
                    custody_bit,
                }
                .tree_hash_root(),
            );
        }

        backend
            .verify_multiple(
                &pubkeys,
                &messages,
                &attestation.aggregate_signature,
                self.get_domain(
                    compute_epoch_at_slot(attestation.data.slot),
                    DOMAIN_ATTESTATION,
                ),
            )
            .map_err(|err| Error::BeaconState(err.into()))
    }

    /// Validate ``attestation`` and record it as pending.
    pub fn process_attestation(
        &mut self,
        attestation: &Attestation,
        backend: &impl SignatureBackend,
    ) -> Result<(), Error> {
        self.validate_attestation(attestation, backend)?;

        self.latest_attestations
            .push(PendingAttestation {
                aggregation_bitfield: attestation.aggregation_bitfield.clone(),
                data: attestation.data.clone(),
                custody_bitfield: attestation.custody_bitfield.clone(),
                inclusion_slot: self.slot,
            })
            .map_err(|err| Error::BeaconState(err.into()))?;
        debug!(
            slot = attestation.data.slot,
            shard = attestation.data.shard,
            "Accepted attestation"
        );

        Ok(())
    }

    pub fn process_attestations(
        &mut self,
        attestations: &[Attestation],
        backend: &impl SignatureBackend,
    ) -> Result<(), BlockProcessingError> {
        for (index, attestation) in attestations.iter().enumerate() {
            self.process_attestation(attestation, backend)
                .map_err(|err| err.into_with_index(index))?;
        }
        Ok(())
    }
}
