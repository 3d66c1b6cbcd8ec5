#[macro_use]
mod macros;

pub mod attestation;
pub mod attestation_data;
pub mod attestation_data_and_custody_bit;
pub mod beacon_block;
pub mod beacon_state;
pub mod constants;
pub mod crosslink;
pub mod deposit;
pub mod deposit_data;
pub mod deposit_input;
pub mod errors;
pub mod eth_1_data;
pub mod fork;
pub mod misc;
pub mod pending_attestation;
pub mod proposal_signed_data;
pub mod proposer_slashing;
pub mod state_transition;
pub mod validator;

#[cfg(test)]
mod test_utils;
