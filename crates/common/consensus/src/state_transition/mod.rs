pub mod attestations;
pub mod block;
pub mod deposits;
pub mod eth1_data;
pub mod genesis;
pub mod proposer_signature;
pub mod proposer_slashings;
pub mod randao;
pub mod slot;
pub mod validator_status;

pub use block::state_transition;
pub use genesis::get_genesis_beacon_state;
