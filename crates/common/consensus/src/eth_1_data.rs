use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

#[derive(
    Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash, Hash, Default,
)]
pub struct Eth1Data {
    /// Root of the deposit tree
    pub deposit_root: B256,
    pub block_hash: B256,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct Eth1DataVote {
    pub eth1_data: Eth1Data,
    #[serde(with = "serde_utils::quoted_u64")]
    pub vote_count: u64,
}
