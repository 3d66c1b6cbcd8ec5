//! A fake Eth1 chain start: deterministic validator keys, their deposits and a signed block
//! producer, for local networks and tests.

pub mod attestation;
pub mod block;
pub mod deposits;
pub mod genesis;
pub mod keypairs;
