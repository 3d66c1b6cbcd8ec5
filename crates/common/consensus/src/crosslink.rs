use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

#[derive(
    Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, Encode, Decode, TreeHash, Default,
)]
pub struct Crosslink {
    #[serde(with = "serde_utils::quoted_u64")]
    pub epoch: u64,
    pub shard_block_root: B256,
}
