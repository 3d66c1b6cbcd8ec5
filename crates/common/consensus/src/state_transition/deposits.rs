use strata_bls::SignatureBackend;
use strata_merkle::is_valid_merkle_branch;
use tracing::debug;

use crate::{
    beacon_state::BeaconState,
    constants::{DEPOSIT_CONTRACT_TREE_DEPTH, DOMAIN_DEPOSIT},
    deposit::Deposit,
    deposit_data::DepositData,
    errors::{
        BlockProcessingError, DepositInvalid, DepositValidationError as Error, IntoWithIndex,
    },
    validator::Validator,
};

impl BeaconState {
    /// Credit the deposited amount to the validator owning the deposit's public key, adding a
    /// pending validator to the registry if the key is new. Does not touch ``deposit_index``.
    ///
    /// A deposit whose proof of possession does not verify is ignored.
    pub fn apply_deposit(
        &mut self,
        deposit_data: &DepositData,
        backend: &impl SignatureBackend,
    ) -> Result<(), Error> {
        let amount = deposit_data.amount;
        let deposit_input = &deposit_data.deposit_input;
        let pubkey = &deposit_input.pubkey;
        let withdrawal_credentials = deposit_input.withdrawal_credentials;

        // Malformed keys or signatures count as an invalid proof
        let has_valid_proof = matches!(
            backend.verify(
                pubkey,
                deposit_input.signed_root(),
                &deposit_input.proof_of_possession,
                self.get_domain(self.get_current_epoch(), DOMAIN_DEPOSIT),
            ),
            Ok(true)
        );
        if !has_valid_proof {
            debug!(amount, "Ignored deposit with invalid proof of possession");
            return Ok(());
        }

        let existing_index = self
            .validator_registry
            .iter()
            .position(|validator| validator.pubkey == *pubkey);

        match existing_index {
            Some(index) => {
                let index = index as u64;
                verify!(
                    self.get_validator(index)?.withdrawal_credentials == withdrawal_credentials,
                    DepositInvalid::WithdrawalCredentialsMismatch(index)
                );
                self.increase_balance(index, amount)?;
                debug!(index, amount, "Topped up validator");
            }
            None => {
                self.validator_registry
                    .push(Validator::pending(pubkey.clone(), withdrawal_credentials))
                    .map_err(|err| Error::BeaconState(err.into()))?;
                self.validator_balances
                    .push(amount)
                    .map_err(|err| Error::BeaconState(err.into()))?;
                debug!(
                    index = self.validator_registry.len() - 1,
                    amount, "Added validator to registry"
                );
            }
        }

        Ok(())
    }

    /// Verify ``deposit`` against the deposit index and deposit root of the state, then apply it.
    ///
    /// The deposit index advances even when the deposit is ignored for an invalid proof of
    /// possession.
    pub fn process_deposit(
        &mut self,
        deposit: &Deposit,
        backend: &impl SignatureBackend,
    ) -> Result<(), Error> {
        verify!(
            deposit.index == self.deposit_index,
            DepositInvalid::BadIndex {
                state: self.deposit_index,
                deposit: deposit.index,
            }
        );
        verify!(
            is_valid_merkle_branch(
                deposit.deposit_data.leaf(),
                &deposit.branch,
                DEPOSIT_CONTRACT_TREE_DEPTH,
                deposit.index,
                self.latest_eth1_data.deposit_root,
            ),
            DepositInvalid::BadMerkleProof
        );

        self.apply_deposit(&deposit.deposit_data, backend)?;
        self.deposit_index += 1;

        Ok(())
    }

    pub fn process_deposits(
        &mut self,
        deposits: &[Deposit],
        backend: &impl SignatureBackend,
    ) -> Result<(), BlockProcessingError> {
        for (index, deposit) in deposits.iter().enumerate() {
            self.process_deposit(deposit, backend)
                .map_err(|err| err.into_with_index(index))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;
    use strata_bls::{BLSSignature, BlstBackend};
    use tracing_test::traced_test;

    use super::*;
    use crate::{
        constants::{FAR_FUTURE_EPOCH, MAX_DEPOSIT_AMOUNT},
        errors::{BlockInvalid, DepositValidationError},
        test_utils::{deposit_data, deposits, genesis_state, pubkey},
    };

    /// Genesis state of two validators, expecting the returned deposits next.
    fn state_with_pending_deposits(data: Vec<DepositData>) -> (BeaconState, Vec<Deposit>) {
        let mut state = genesis_state(2);
        let mut all_data = (0..2)
            .map(|index| deposit_data(index, MAX_DEPOSIT_AMOUNT, B256::ZERO))
            .collect::<Vec<_>>();
        all_data.extend(data);
        let (all_deposits, deposit_root) = deposits(all_data);
        state.latest_eth1_data.deposit_root = deposit_root;
        (state, all_deposits[2..].to_vec())
    }

    #[test]
    fn test_process_deposits_appends_validators() {
        let (mut state, deposits) = state_with_pending_deposits(vec![
            deposit_data(2, MAX_DEPOSIT_AMOUNT, B256::ZERO),
            deposit_data(3, MAX_DEPOSIT_AMOUNT, B256::ZERO),
        ]);

        state.process_deposits(&deposits, &BlstBackend).unwrap();

        assert_eq!(state.deposit_index, 4);
        assert_eq!(state.validator_registry.len(), 4);
        assert_eq!(state.validator_registry[3].pubkey, pubkey(3));
        assert_eq!(state.validator_registry[3].activation_epoch, FAR_FUTURE_EPOCH);
        assert_eq!(state.validator_balances[3], MAX_DEPOSIT_AMOUNT);
    }

    #[test]
    fn test_out_of_order_deposit_is_rejected() {
        let (mut state, deposits) = state_with_pending_deposits(vec![
            deposit_data(2, MAX_DEPOSIT_AMOUNT, B256::ZERO),
            deposit_data(3, MAX_DEPOSIT_AMOUNT, B256::ZERO),
            deposit_data(4, MAX_DEPOSIT_AMOUNT, B256::ZERO),
        ]);
        let reordered = vec![
            deposits[0].clone(),
            deposits[2].clone(),
            deposits[1].clone(),
        ];

        let err = state.process_deposits(&reordered, &BlstBackend).unwrap_err();

        assert_eq!(
            err,
            BlockProcessingError::Invalid(BlockInvalid::DepositInvalid(
                1,
                DepositInvalid::BadIndex {
                    state: 3,
                    deposit: 4
                }
            ))
        );
    }

    #[test]
    fn test_deposit_with_bad_branch_is_rejected() {
        let (mut state, mut deposits) =
            state_with_pending_deposits(vec![deposit_data(2, MAX_DEPOSIT_AMOUNT, B256::ZERO)]);
        deposits[0].deposit_data.amount += 1;

        assert_eq!(
            state.process_deposit(&deposits[0], &BlstBackend),
            Err(DepositValidationError::Invalid(DepositInvalid::BadMerkleProof))
        );
        assert_eq!(state.deposit_index, 2);
    }

    #[test]
    fn test_repeated_pubkey_accumulates_balance() {
        let amount_a = 3_000_000_000;
        let amount_b = 5_000_000_000;
        let (mut state, deposits) = state_with_pending_deposits(vec![
            deposit_data(2, amount_a, B256::ZERO),
            deposit_data(2, amount_b, B256::ZERO),
        ]);

        state.process_deposits(&deposits, &BlstBackend).unwrap();

        assert_eq!(state.validator_registry.len(), 3);
        assert_eq!(state.validator_balances[2], amount_a + amount_b);
        assert_eq!(state.deposit_index, 4);
    }

    #[test]
    #[traced_test]
    fn test_deposit_without_proof_of_possession_adds_no_validator() {
        let mut unsigned = deposit_data(2, MAX_DEPOSIT_AMOUNT, B256::ZERO);
        unsigned.deposit_input.proof_of_possession = BLSSignature::empty();
        let (mut state, deposits) = state_with_pending_deposits(vec![unsigned]);

        state.process_deposits(&deposits, &BlstBackend).unwrap();

        assert_eq!(state.validator_registry.len(), 2);
        assert_eq!(state.validator_balances.len(), 2);
        assert_eq!(state.deposit_index, 3);
        assert!(logs_contain("Ignored deposit with invalid proof of possession"));
    }

    #[test]
    fn test_proof_signed_by_another_key_credits_nothing() {
        let mut top_up = deposit_data(1, MAX_DEPOSIT_AMOUNT, B256::ZERO);
        top_up.deposit_input.proof_of_possession = deposit_data(0, MAX_DEPOSIT_AMOUNT, B256::ZERO)
            .deposit_input
            .proof_of_possession;
        let (mut state, deposits) = state_with_pending_deposits(vec![top_up]);
        let balance = state.validator_balances[1];

        state.process_deposits(&deposits, &BlstBackend).unwrap();

        assert_eq!(state.validator_balances[1], balance);
        assert_eq!(state.deposit_index, 3);
    }

    #[test]
    fn test_apply_deposit_leaves_deposit_index() {
        let mut state = genesis_state(1);
        state
            .apply_deposit(
                &deposit_data(5, MAX_DEPOSIT_AMOUNT, B256::ZERO),
                &BlstBackend,
            )
            .unwrap();

        assert_eq!(state.deposit_index, 1);
        assert_eq!(state.validator_registry.len(), 2);
    }
}
