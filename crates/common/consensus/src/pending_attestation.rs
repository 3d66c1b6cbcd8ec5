use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

use crate::{attestation::Bitfield, attestation_data::AttestationData};

/// An accepted attestation awaiting epoch processing.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct PendingAttestation {
    #[serde(with = "ssz_types::serde_utils::hex_var_list")]
    pub aggregation_bitfield: Bitfield,
    pub data: AttestationData,
    #[serde(with = "ssz_types::serde_utils::hex_var_list")]
    pub custody_bitfield: Bitfield,
    #[serde(with = "serde_utils::quoted_u64")]
    pub inclusion_slot: u64,
}
