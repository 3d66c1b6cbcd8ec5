use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use strata_bls::PubKey;
use tree_hash_derive::TreeHash;

use crate::constants::FAR_FUTURE_EPOCH;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct Validator {
    pub pubkey: PubKey,

    /// Commitment to pubkey for withdrawals and transfers
    pub withdrawal_credentials: B256,

    /// Epoch when the validator became active
    #[serde(with = "serde_utils::quoted_u64")]
    pub activation_epoch: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub exit_epoch: u64,

    /// When validator can withdraw funds
    #[serde(with = "serde_utils::quoted_u64")]
    pub withdrawable_epoch: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub slashed_epoch: u64,
    pub slashed: bool,
}

impl Validator {
    /// A freshly deposited validator with every epoch at ``FAR_FUTURE_EPOCH``.
    pub fn pending(pubkey: PubKey, withdrawal_credentials: B256) -> Self {
        Self {
            pubkey,
            withdrawal_credentials,
            activation_epoch: FAR_FUTURE_EPOCH,
            exit_epoch: FAR_FUTURE_EPOCH,
            withdrawable_epoch: FAR_FUTURE_EPOCH,
            slashed_epoch: FAR_FUTURE_EPOCH,
            slashed: false,
        }
    }

    pub fn is_active_validator(&self, epoch: u64) -> bool {
        self.activation_epoch <= epoch && epoch < self.exit_epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_window_is_half_open() {
        let mut validator = Validator::pending(PubKey::default(), B256::ZERO);
        assert!(!validator.is_active_validator(0));

        validator.activation_epoch = 10;
        validator.exit_epoch = 12;
        assert!(!validator.is_active_validator(9));
        assert!(validator.is_active_validator(10));
        assert!(validator.is_active_validator(11));
        assert!(!validator.is_active_validator(12));
    }
}
