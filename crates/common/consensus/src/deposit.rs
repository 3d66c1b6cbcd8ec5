use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{FixedVector, typenum::U32};
use tree_hash_derive::TreeHash;

use crate::deposit_data::DepositData;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct Deposit {
    /// Branch in the deposit tree
    pub branch: FixedVector<B256, U32>,

    /// Index in the deposit tree
    #[serde(with = "serde_utils::quoted_u64")]
    pub index: u64,
    pub deposit_data: DepositData,
}
