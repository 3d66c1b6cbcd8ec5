use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{
    VariableList,
    typenum::{U16, U128},
};
use strata_bls::BLSSignature;
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

use crate::{
    attestation::Attestation, deposit::Deposit, eth_1_data::Eth1Data,
    proposer_slashing::ProposerSlashing,
};

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct BeaconBlock {
    // Header
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,
    pub parent_root: B256,
    pub state_root: B256,
    pub randao_reveal: BLSSignature,
    pub eth1_data: Eth1Data,

    pub body: BeaconBlockBody,
    pub signature: BLSSignature,
}

impl BeaconBlock {
    /// Root of the block with its signature zeroed, the value a proposer signs.
    pub fn signed_root(&self) -> B256 {
        BeaconBlock {
            signature: BLSSignature::empty(),
            ..self.clone()
        }
        .tree_hash_root()
    }
}

/// Operations are capped at ``MAX_PROPOSER_SLASHINGS``, ``MAX_ATTESTATIONS`` and ``MAX_DEPOSITS``
/// by the list bounds.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash, Default)]
pub struct BeaconBlockBody {
    pub proposer_slashings: VariableList<ProposerSlashing, U16>,
    pub attestations: VariableList<Attestation, U128>,
    pub deposits: VariableList<Deposit, U16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_root_ignores_signature() {
        let block = BeaconBlock {
            slot: 1,
            parent_root: B256::repeat_byte(1),
            state_root: B256::repeat_byte(2),
            randao_reveal: BLSSignature::empty(),
            eth1_data: Eth1Data::default(),
            body: BeaconBlockBody::default(),
            signature: BLSSignature::empty(),
        };
        let signed = BeaconBlock {
            signature: BLSSignature::from_bytes(&[7; 96]).unwrap(),
            ..block.clone()
        };
        assert_eq!(block.signed_root(), signed.signed_root());
        assert_eq!(block.signed_root(), block.tree_hash_root());
        assert_ne!(signed.signed_root(), signed.tree_hash_root());
    }
}
