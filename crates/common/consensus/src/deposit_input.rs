use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use strata_bls::{BLSSignature, PubKey};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct DepositInput {
    pub pubkey: PubKey,
    pub withdrawal_credentials: B256,

    /// A BLS signature of this `DepositInput`
    pub proof_of_possession: BLSSignature,
}

impl DepositInput {
    /// Root of the input with its proof of possession zeroed, the value the depositor signs.
    pub fn signed_root(&self) -> B256 {
        DepositInput {
            proof_of_possession: BLSSignature::empty(),
            ..self.clone()
        }
        .tree_hash_root()
    }
}
