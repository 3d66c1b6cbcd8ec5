use alloy_primitives::B256;
use anyhow::anyhow;
use ethereum_hashing::hash_fixed;
use ssz_types::FixedVector;
use strata_bls::{BLSSignature, PubKey, SignatureBackend};
use strata_consensus::{
    constants::{
        DEPOSIT_CONTRACT_TREE_DEPTH, DOMAIN_DEPOSIT, GENESIS_EPOCH, GENESIS_FORK_VERSION,
        MAX_DEPOSIT_AMOUNT,
    },
    deposit::Deposit,
    deposit_data::DepositData,
    deposit_input::DepositInput,
    eth_1_data::Eth1Data,
    fork::Fork,
};
use strata_merkle::SparseMerkleTree;
use tracing::debug;

use crate::keypairs::Keypair;

pub const BLS_WITHDRAWAL_PREFIX_BYTE: u8 = 0;

/// Withdrawal credentials committing to ``pubkey``.
pub fn bls_withdrawal_credentials(pubkey: &PubKey) -> B256 {
    let mut credentials = B256::from(hash_fixed(pubkey.to_bytes()));
    credentials[0] = BLS_WITHDRAWAL_PREFIX_BYTE;
    credentials
}

/// A deposit of ``amount`` for ``keypair`` carrying its proof of possession.
pub fn deposit_data(
    keypair: &Keypair,
    amount: u64,
    timestamp: u64,
    backend: &impl SignatureBackend,
) -> anyhow::Result<DepositData> {
    let mut deposit_input = DepositInput {
        pubkey: keypair.public_key.clone(),
        withdrawal_credentials: bls_withdrawal_credentials(&keypair.public_key),
        proof_of_possession: BLSSignature::empty(),
    };
    let genesis_fork = Fork {
        previous_version: GENESIS_FORK_VERSION,
        current_version: GENESIS_FORK_VERSION,
        epoch: GENESIS_EPOCH,
    };
    deposit_input.proof_of_possession = backend.sign(
        &keypair.private_key,
        deposit_input.signed_root(),
        genesis_fork.get_domain(GENESIS_EPOCH, DOMAIN_DEPOSIT),
    )?;

    Ok(DepositData {
        amount,
        timestamp,
        deposit_input,
    })
}

/// Place ``deposit_data`` at indices ``0..len`` of a fresh deposit tree.
///
/// Returns the deposits with their branches and the ``Eth1Data`` naming the tree root.
pub fn build_deposits(
    deposit_data: Vec<DepositData>,
    eth1_block_hash: B256,
) -> anyhow::Result<(Vec<Deposit>, Eth1Data)> {
    let leaves = deposit_data
        .iter()
        .map(DepositData::leaf)
        .collect::<Vec<_>>();
    let tree = SparseMerkleTree::new(&leaves, DEPOSIT_CONTRACT_TREE_DEPTH)?;

    let deposits = deposit_data
        .into_iter()
        .enumerate()
        .map(|(index, deposit_data)| {
            let branch = FixedVector::new(tree.generate_proof(index as u64)?)
                .map_err(|err| anyhow!("Deposit branch has the wrong depth: {err:?}"))?;
            Ok(Deposit {
                branch,
                index: index as u64,
                deposit_data,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    debug!(count = deposits.len(), deposit_root = %tree.root(), "Built deposit tree");

    Ok((
        deposits,
        Eth1Data {
            deposit_root: tree.root(),
            block_hash: eth1_block_hash,
        },
    ))
}

/// Fully funded chain-start deposits for every keypair.
pub fn interop_deposits(
    keypairs: &[Keypair],
    timestamp: u64,
    eth1_block_hash: B256,
    backend: &impl SignatureBackend,
) -> anyhow::Result<(Vec<Deposit>, Eth1Data)> {
    let deposit_data = keypairs
        .iter()
        .map(|keypair| deposit_data(keypair, MAX_DEPOSIT_AMOUNT, timestamp, backend))
        .collect::<anyhow::Result<Vec<_>>>()?;
    build_deposits(deposit_data, eth1_block_hash)
}
