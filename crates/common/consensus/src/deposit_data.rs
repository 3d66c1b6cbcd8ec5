use alloy_primitives::B256;
use ethereum_hashing::hash_fixed;
use serde::{Deserialize, Serialize};
use ssz::Encode;
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

use crate::deposit_input::DepositInput;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct DepositData {
    /// Amount in Gwei
    #[serde(with = "serde_utils::quoted_u64")]
    pub amount: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub timestamp: u64,
    pub deposit_input: DepositInput,
}

impl DepositData {
    /// Leaf of this deposit in the deposit contract tree.
    pub fn leaf(&self) -> B256 {
        B256::from(hash_fixed(&self.as_ssz_bytes()))
    }
}
