use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{VariableList, typenum::U4096};
use strata_bls::BLSSignature;
use tree_hash_derive::TreeHash;

use crate::attestation_data::AttestationData;

/// One bit per committee seat, packed eight to a byte.
pub type Bitfield = VariableList<u8, U4096>;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct Attestation {
    #[serde(with = "ssz_types::serde_utils::hex_var_list")]
    pub aggregation_bitfield: Bitfield,
    pub data: AttestationData,
    #[serde(with = "ssz_types::serde_utils::hex_var_list")]
    pub custody_bitfield: Bitfield,
    pub aggregate_signature: BLSSignature,
}
