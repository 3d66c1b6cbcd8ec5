use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use strata_bls::BLSSignature;
use tree_hash_derive::TreeHash;

use crate::proposal_signed_data::ProposalSignedData;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct ProposerSlashing {
    #[serde(with = "serde_utils::quoted_u64")]
    pub proposer_index: u64,
    pub proposal_data_1: ProposalSignedData,
    pub proposal_signature_1: BLSSignature,
    pub proposal_data_2: ProposalSignedData,
    pub proposal_signature_2: BLSSignature,
}
