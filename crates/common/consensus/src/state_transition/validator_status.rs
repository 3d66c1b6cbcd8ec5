use tracing::debug;

use crate::{
    beacon_state::BeaconState,
    constants::{GENESIS_EPOCH, LATEST_SLASHED_EXIT_LENGTH, WHISTLEBLOWER_REWARD_QUOTIENT},
    errors::BeaconStateError,
    misc::{compute_start_slot_at_epoch, get_entry_exit_effect_epoch},
};

impl BeaconState {
    /// Activate the validator of the given ``index``.
    pub fn activate_validator(
        &mut self,
        index: u64,
        is_genesis: bool,
    ) -> Result<(), BeaconStateError> {
        let activation_epoch = if is_genesis {
            GENESIS_EPOCH
        } else {
            get_entry_exit_effect_epoch(self.get_current_epoch())
        };
        self.get_validator_mut(index)?.activation_epoch = activation_epoch;
        Ok(())
    }

    /// Exit the validator of the given ``index``. An exit already scheduled earlier is kept.
    pub fn exit_validator(&mut self, index: u64) -> Result<(), BeaconStateError> {
        let exit_epoch = get_entry_exit_effect_epoch(self.get_current_epoch());
        let validator = self.get_validator_mut(index)?;
        if validator.exit_epoch <= exit_epoch {
            return Ok(());
        }
        validator.exit_epoch = exit_epoch;
        Ok(())
    }

    /// Slash the validator with index ``index``, rewarding the current proposer as whistleblower.
    pub fn slash_validator(&mut self, index: u64) -> Result<(), BeaconStateError> {
        let withdrawable_epoch = self.get_validator(index)?.withdrawable_epoch;
        if self.slot >= compute_start_slot_at_epoch(withdrawable_epoch) {
            return Err(BeaconStateError::ValidatorNotSlashable {
                index,
                slot: self.slot,
            });
        }

        self.exit_validator(index)?;

        let current_epoch = self.get_current_epoch();
        let effective_balance = self.get_effective_balance(index)?;
        let slashed_balance = &mut self.latest_slashed_balances
            [(current_epoch % LATEST_SLASHED_EXIT_LENGTH) as usize];
        *slashed_balance = slashed_balance.saturating_add(effective_balance);

        let whistleblower_index = self.get_beacon_proposer_index(self.slot)?;
        let whistleblower_reward = effective_balance / WHISTLEBLOWER_REWARD_QUOTIENT;
        self.increase_balance(whistleblower_index, whistleblower_reward)?;
        self.decrease_balance(index, whistleblower_reward)?;

        let validator = self.get_validator_mut(index)?;
        validator.slashed = true;
        validator.slashed_epoch = current_epoch;
        validator.withdrawable_epoch = current_epoch + LATEST_SLASHED_EXIT_LENGTH;

        debug!(
            index,
            whistleblower_index, whistleblower_reward, "Slashed validator"
        );
        Ok(())
    }
}
