use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize, Encode, Decode, TreeHash, Eq)]
pub struct Fork {
    #[serde(with = "serde_utils::quoted_u64")]
    pub previous_version: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub current_version: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub epoch: u64,
}

impl Fork {
    /// Return the fork version in effect at ``epoch``.
    pub fn get_fork_version(&self, epoch: u64) -> u64 {
        if epoch < self.epoch {
            self.previous_version
        } else {
            self.current_version
        }
    }

    /// Return the signature domain of ``domain_type`` at ``epoch``.
    pub fn get_domain(&self, epoch: u64, domain_type: u64) -> u64 {
        self.get_fork_version(epoch)
            .wrapping_mul(1 << 32)
            .wrapping_add(domain_type)
    }
}
