use alloy_primitives::B256;
use strata_bls::errors::BLSError;
use thiserror::Error;

/// Coarse classification of why a block or operation was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// An index or slot does not refer to the expected entry.
    Index,
    /// A signature failed to verify or could not be decoded.
    Signature,
    /// A slot or epoch falls outside the accepted range.
    Window,
    /// The operation is malformed or inconsistent with the state.
    Structural,
}

pub trait IntoWithIndex<T>: Sized {
    fn into_with_index(self, index: usize) -> T;
}

/// Failure to read or update the state itself, independent of any block content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BeaconStateError {
    #[error("Unknown validator index {0}")]
    UnknownValidator(u64),

    #[error("Slot {slot} is outside the block root range of state slot {state_slot}")]
    SlotOutOfRange { slot: u64, state_slot: u64 },

    #[error("Epoch {epoch} is outside the committee range {previous_epoch}..={next_epoch}")]
    EpochOutOfRange {
        epoch: u64,
        previous_epoch: u64,
        next_epoch: u64,
    },

    #[error("No committees are assigned to slot {0}")]
    EmptyCommittee(u64),

    #[error("Shuffle index {index} out of bounds for {index_count} values")]
    ShuffleIndexOutOfBounds { index: usize, index_count: usize },

    #[error("Validator {index} is no longer slashable at slot {slot}")]
    ValidatorNotSlashable { index: u64, slot: u64 },

    #[error("Balance of validator {0} overflowed")]
    BalanceOverflow(u64),

    #[error("List capacity exceeded: {0}")]
    ListFull(String),

    #[error("Merkle error: {0}")]
    Merkle(String),

    #[error("BLS error: {0}")]
    Bls(#[from] BLSError),
}

impl BeaconStateError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BeaconStateError::UnknownValidator(_) | BeaconStateError::EmptyCommittee(_) => {
                ErrorCategory::Index
            }
            BeaconStateError::SlotOutOfRange { .. }
            | BeaconStateError::EpochOutOfRange { .. }
            | BeaconStateError::ValidatorNotSlashable { .. } => ErrorCategory::Window,
            BeaconStateError::Bls(_) => ErrorCategory::Signature,
            BeaconStateError::ShuffleIndexOutOfBounds { .. }
            | BeaconStateError::BalanceOverflow(_)
            | BeaconStateError::ListFull(_)
            | BeaconStateError::Merkle(_) => ErrorCategory::Structural,
        }
    }
}

impl From<ssz_types::Error> for BeaconStateError {
    fn from(err: ssz_types::Error) -> Self {
        BeaconStateError::ListFull(format!("{err:?}"))
    }
}

/*
 * Block Validation
 */

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockProcessingError {
    /// The `BeaconBlock` is invalid.
    #[error("Invalid block: {0}")]
    Invalid(#[from] BlockInvalid),

    #[error("Beacon state error: {0}")]
    BeaconState(#[from] BeaconStateError),
}

impl BlockProcessingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BlockProcessingError::Invalid(err) => err.category(),
            BlockProcessingError::BeaconState(err) => err.category(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockInvalid {
    #[error("Block slot {block} does not match state slot {state}")]
    StateSlotMismatch { state: u64, block: u64 },

    #[error("Bad proposer signature")]
    BadSignature,

    #[error("Bad RANDAO reveal")]
    BadRandaoSignature,

    #[error("Block state root {block} does not match computed root {computed}")]
    StateRootMismatch { block: B256, computed: B256 },

    #[error("Proposer slashing {0} is invalid: {1}")]
    ProposerSlashingInvalid(usize, ProposerSlashingInvalid),

    #[error("Attestation {0} is invalid: {1}")]
    AttestationInvalid(usize, AttestationInvalid),

    #[error("Deposit {0} is invalid: {1}")]
    DepositInvalid(usize, DepositInvalid),
}

impl BlockInvalid {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BlockInvalid::StateSlotMismatch { .. } => ErrorCategory::Index,
            BlockInvalid::BadSignature | BlockInvalid::BadRandaoSignature => {
                ErrorCategory::Signature
            }
            BlockInvalid::StateRootMismatch { .. } => ErrorCategory::Structural,
            BlockInvalid::ProposerSlashingInvalid(_, err) => err.category(),
            BlockInvalid::AttestationInvalid(_, err) => err.category(),
            BlockInvalid::DepositInvalid(_, err) => err.category(),
        }
    }
}

/*
 * Attestation Validation
 */

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttestationValidationError {
    /// The `Attestation` is invalid.
    Invalid(AttestationInvalid),
    /// Encountered a `BeaconStateError` whilst attempting to determine validity.
    BeaconState(BeaconStateError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttestationInvalid {
    #[error("Attestation for slot {attestation} included too early at slot {state}")]
    IncludedTooEarly { state: u64, attestation: u64 },

    #[error("Attestation for slot {attestation} included too late at slot {state}")]
    IncludedTooLate { state: u64, attestation: u64 },

    #[error("Justified epoch {attestation} does not match expected {state}")]
    WrongJustifiedEpoch { state: u64, attestation: u64 },

    #[error("Justified block root {attestation} does not match expected {state}")]
    WrongJustifiedRoot { state: B256, attestation: B256 },

    #[error("Latest crosslink does not match the state")]
    BadLatestCrosslinkRoot,

    #[error("Custody bitfield has set bits")]
    CustodyBitfieldHasSetBits,

    #[error("Aggregation bitfield is empty")]
    AggregationBitfieldIsEmpty,

    #[error("Aggregation bitfield does not fit committee of {committee_size}")]
    BadAggregationBitfieldLength { committee_size: usize },

    #[error("Custody bitfield does not fit committee of {committee_size}")]
    BadCustodyBitfieldLength { committee_size: usize },

    #[error("Custody bit {0} is set for a non-participant")]
    CustodyBitWithoutAggregationBit(usize),

    #[error("No committee for shard {shard} at slot {slot}")]
    NoCommitteeForShard { shard: u64, slot: u64 },

    #[error("Bad aggregate signature")]
    BadSignature,

    #[error("Shard block root is not zero")]
    ShardBlockRootNotZero,
}

impl AttestationInvalid {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AttestationInvalid::IncludedTooEarly { .. }
            | AttestationInvalid::IncludedTooLate { .. } => ErrorCategory::Window,
            AttestationInvalid::NoCommitteeForShard { .. } => ErrorCategory::Index,
            AttestationInvalid::BadSignature => ErrorCategory::Signature,
            AttestationInvalid::WrongJustifiedEpoch { .. }
            | AttestationInvalid::WrongJustifiedRoot { .. }
            | AttestationInvalid::BadLatestCrosslinkRoot
            | AttestationInvalid::CustodyBitfieldHasSetBits
            | AttestationInvalid::AggregationBitfieldIsEmpty
            | AttestationInvalid::BadAggregationBitfieldLength { .. }
            | AttestationInvalid::BadCustodyBitfieldLength { .. }
            | AttestationInvalid::CustodyBitWithoutAggregationBit(_)
            | AttestationInvalid::ShardBlockRootNotZero => ErrorCategory::Structural,
        }
    }
}

impl_from_beacon_state_error!(AttestationValidationError);
impl_into_with_index!(AttestationValidationError, AttestationInvalid);

/*
 * `ProposerSlashing` Validation
 */

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposerSlashingValidationError {
    Invalid(ProposerSlashingInvalid),
    BeaconState(BeaconStateError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProposerSlashingInvalid {
    #[error("Proposer {0} is unknown")]
    ProposerUnknown(u64),

    #[error("Proposals are for different slots")]
    ProposalSlotMismatch,

    #[error("Proposals are for different shards")]
    ProposalShardMismatch,

    #[error("Proposals have the same block root")]
    ProposalBlockRootsIdentical,

    #[error("Proposer {0} is already slashed")]
    ProposerAlreadySlashed(u64),

    #[error("Bad signature on proposal 1")]
    BadProposal1Signature,

    #[error("Bad signature on proposal 2")]
    BadProposal2Signature,
}

impl ProposerSlashingInvalid {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ProposerSlashingInvalid::ProposerUnknown(_) => ErrorCategory::Index,
            ProposerSlashingInvalid::BadProposal1Signature
            | ProposerSlashingInvalid::BadProposal2Signature => ErrorCategory::Signature,
            ProposerSlashingInvalid::ProposerAlreadySlashed(_) => ErrorCategory::Window,
            ProposerSlashingInvalid::ProposalSlotMismatch
            | ProposerSlashingInvalid::ProposalShardMismatch
            | ProposerSlashingInvalid::ProposalBlockRootsIdentical => ErrorCategory::Structural,
        }
    }
}

impl_from_beacon_state_error!(ProposerSlashingValidationError);
impl_into_with_index!(ProposerSlashingValidationError, ProposerSlashingInvalid);

/*
 * `Deposit` Validation
 */

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepositValidationError {
    Invalid(DepositInvalid),
    BeaconState(BeaconStateError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DepositInvalid {
    #[error("Deposit index {deposit} does not match state deposit index {state}")]
    BadIndex { state: u64, deposit: u64 },

    #[error("Deposit Merkle branch does not verify against the deposit root")]
    BadMerkleProof,

    #[error("Withdrawal credentials do not match validator {0}")]
    WithdrawalCredentialsMismatch(u64),
}

impl DepositInvalid {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DepositInvalid::BadIndex { .. } => ErrorCategory::Index,
            DepositInvalid::BadMerkleProof | DepositInvalid::WithdrawalCredentialsMismatch(_) => {
                ErrorCategory::Structural
            }
        }
    }
}

impl_from_beacon_state_error!(DepositValidationError);
impl_into_with_index!(DepositValidationError, DepositInvalid);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_errors_keep_their_category() {
        let err = AttestationValidationError::Invalid(AttestationInvalid::IncludedTooLate {
            state: 100,
            attestation: 10,
        })
        .into_with_index(3);
        assert_eq!(err.category(), ErrorCategory::Window);
        assert!(matches!(
            err,
            BlockProcessingError::Invalid(BlockInvalid::AttestationInvalid(3, _))
        ));

        let err = DepositValidationError::BeaconState(BeaconStateError::Bls(
            BLSError::InvalidSignature,
        ))
        .into_with_index(0);
        assert_eq!(err.category(), ErrorCategory::Signature);
    }
}
