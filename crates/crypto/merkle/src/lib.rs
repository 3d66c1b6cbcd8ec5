//! Merkle proofs over a fixed depth binary tree of 32 byte nodes.
//!
//! Trees are kept sparse: only the populated prefix of every layer is stored and the missing right
//! hand nodes are filled in from precomputed zero subtree roots. This keeps a depth 32 deposit
//! tree proportional to the number of deposits instead of ``2**32``.

use alloy_primitives::B256;
use anyhow::ensure;

mod hash;
mod index;

use hash::{hash_concat, zero_hashes};
use index::{LeafIndex, get_index_bit, sibling_index};

/// Layers of a sparse Merkle tree of ``depth``, from the leaves (``layers[0]``) up to the root
/// (``layers[depth]``).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseMerkleTree {
    depth: u64,
    layers: Vec<Vec<B256>>,
    zero_hashes: Vec<B256>,
}

impl SparseMerkleTree {
    pub fn new(leaves: &[B256], depth: u64) -> anyhow::Result<Self> {
        ensure!(depth < u64::BITS as u64, "Depth {depth} is too large");
        ensure!(
            (leaves.len() as u64) <= 1 << depth,
            "Number of leaves is greater than the bottom length (depth too small)"
        );

        let zero_hashes = zero_hashes(depth);
        let mut layers = vec![leaves.to_vec()];
        for height in 0..depth as usize {
            let below = &layers[height];
            let layer = below
                .chunks(2)
                .map(|pair| {
                    let right = pair.get(1).unwrap_or(&zero_hashes[height]);
                    hash_concat(pair[0].as_slice(), right.as_slice())
                })
                .collect();
            layers.push(layer);
        }

        Ok(Self {
            depth,
            layers,
            zero_hashes,
        })
    }

    pub fn depth(&self) -> u64 {
        self.depth
    }

    pub fn leaf_count(&self) -> usize {
        self.layers[0].len()
    }

    pub fn root(&self) -> B256 {
        self.layers[self.depth as usize]
            .first()
            .copied()
            .unwrap_or(self.zero_hashes[self.depth as usize])
    }

    /// Sibling nodes from the leaf at ``index`` up to (excluding) the root.
    pub fn generate_proof(&self, index: LeafIndex) -> anyhow::Result<Vec<B256>> {
        ensure!(
            index < 1 << self.depth,
            "Index {index} out of bounds for depth {}",
            self.depth
        );

        let mut proof = Vec::with_capacity(self.depth as usize);
        let mut position = index as usize;
        for (height, layer) in self.layers[..self.depth as usize].iter().enumerate() {
            proof.push(
                layer
                    .get(sibling_index(position))
                    .copied()
                    .unwrap_or(self.zero_hashes[height]),
            );
            position /= 2;
        }

        Ok(proof)
    }
}

/// Check if ``leaf`` at ``index`` verifies against the Merkle ``root`` and ``branch``.
///
/// A branch shorter than ``depth`` never verifies.
pub fn is_valid_merkle_branch(
    leaf: B256,
    branch: &[B256],
    depth: u64,
    index: u64,
    root: B256,
) -> bool {
    if (branch.len() as u64) < depth {
        return false;
    }

    let mut value = leaf;
    for (i, node) in branch.iter().take(depth as usize).enumerate() {
        if get_index_bit(index, i as u64) {
            value = hash_concat(node.as_slice(), value.as_slice());
        } else {
            value = hash_concat(value.as_slice(), node.as_slice());
        }
    }
    value == root
}
