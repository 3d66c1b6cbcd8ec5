use alloy_primitives::B256;
use strata_bls::{BLSSignature, BlstBackend, PrivateKey, PubKey, SignatureBackend};
use strata_merkle::SparseMerkleTree;
use tree_hash::TreeHash;

use crate::{
    beacon_block::{BeaconBlock, BeaconBlockBody},
    beacon_state::BeaconState,
    constants::{
        DEPOSIT_CONTRACT_TREE_DEPTH, DOMAIN_DEPOSIT, DOMAIN_PROPOSAL, DOMAIN_RANDAO,
        MAX_DEPOSIT_AMOUNT,
    },
    deposit::Deposit,
    deposit_data::DepositData,
    deposit_input::DepositInput,
    eth_1_data::Eth1Data,
    state_transition::{get_genesis_beacon_state, state_transition},
};

pub fn private_key(index: u64) -> PrivateKey {
    let mut ikm = [0u8; 32];
    ikm[..8].copy_from_slice(&(index + 1).to_le_bytes());
    PrivateKey::from_ikm(&ikm).unwrap()
}

pub fn pubkey(index: u64) -> PubKey {
    private_key(index).public_key().unwrap()
}

/// A deposit for the key at ``index`` with a proof of possession valid at genesis.
pub fn deposit_data(index: u64, amount: u64, withdrawal_credentials: B256) -> DepositData {
    let mut deposit_input = DepositInput {
        pubkey: pubkey(index),
        withdrawal_credentials,
        proof_of_possession: BLSSignature::empty(),
    };
    deposit_input.proof_of_possession = BlstBackend
        .sign(
            &private_key(index),
            deposit_input.signed_root(),
            DOMAIN_DEPOSIT,
        )
        .unwrap();
    DepositData {
        amount,
        timestamp: 0,
        deposit_input,
    }
}

/// Deposits at indices ``0..data.len()`` with branches against the returned deposit root.
pub fn deposits(data: Vec<DepositData>) -> (Vec<Deposit>, B256) {
    let leaves = data.iter().map(DepositData::leaf).collect::<Vec<_>>();
    let tree = SparseMerkleTree::new(&leaves, DEPOSIT_CONTRACT_TREE_DEPTH).unwrap();
    let deposits = data
        .into_iter()
        .enumerate()
        .map(|(index, deposit_data)| Deposit {
            branch: tree.generate_proof(index as u64).unwrap().into(),
            index: index as u64,
            deposit_data,
        })
        .collect();
    (deposits, tree.root())
}

/// Genesis state with ``count`` fully funded validators keyed by [private_key].
pub fn genesis_state(count: u64) -> BeaconState {
    let (deposits, deposit_root) = deposits(
        (0..count)
            .map(|index| deposit_data(index, MAX_DEPOSIT_AMOUNT, B256::ZERO))
            .collect(),
    );
    get_genesis_beacon_state(
        &deposits,
        0,
        Eth1Data {
            deposit_root,
            block_hash: B256::ZERO,
        },
        &BlstBackend,
    )
    .unwrap()
}

pub fn randao_reveal(state: &BeaconState) -> BLSSignature {
    let epoch = state.get_current_epoch();
    let proposer_index = state.get_beacon_proposer_index(state.slot).unwrap();
    BlstBackend
        .sign(
            &private_key(proposer_index),
            epoch.tree_hash_root(),
            state.get_domain(epoch, DOMAIN_RANDAO),
        )
        .unwrap()
}

/// An empty block for the current slot of ``state`` with a valid RANDAO reveal.
pub fn empty_block(state: &BeaconState) -> BeaconBlock {
    BeaconBlock {
        slot: state.slot,
        parent_root: B256::ZERO,
        state_root: B256::ZERO,
        randao_reveal: randao_reveal(state),
        eth1_data: state.latest_eth1_data.clone(),
        body: BeaconBlockBody::default(),
        signature: BLSSignature::empty(),
    }
}

pub fn sign_block(state: &BeaconState, block: &mut BeaconBlock) {
    let proposer_index = state.get_beacon_proposer_index(state.slot).unwrap();
    block.signature = BlstBackend
        .sign(
            &private_key(proposer_index),
            state.block_proposal(block).tree_hash_root(),
            state.get_domain(state.get_current_epoch(), DOMAIN_PROPOSAL),
        )
        .unwrap();
}

/// A signed block at ``slot`` on top of ``state`` whose state root matches the post-state.
pub fn signed_block(state: &BeaconState, slot: u64, body: BeaconBlockBody) -> BeaconBlock {
    let parent_root = B256::repeat_byte(0xaa);
    let mut advanced = state.clone();
    while advanced.slot < slot {
        advanced.advance_slot(parent_root).unwrap();
    }

    let mut block = BeaconBlock {
        parent_root,
        body,
        ..empty_block(&advanced)
    };
    sign_block(&advanced, &mut block);
    block.state_root = state_transition(state, &block, &BlstBackend, false)
        .unwrap()
        .tree_hash_root();
    sign_block(&advanced, &mut block);
    block
}
