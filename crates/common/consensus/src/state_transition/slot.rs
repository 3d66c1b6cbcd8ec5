use alloy_primitives::B256;
use strata_merkle::SparseMerkleTree;
use tracing::trace;

use crate::{
    beacon_state::BeaconState,
    constants::{LATEST_BLOCK_ROOTS_LENGTH, LATEST_BLOCK_ROOTS_TREE_DEPTH},
    errors::BeaconStateError,
};

impl BeaconState {
    /// Move the state to the next slot, recording ``previous_block_root`` as the root of the block
    /// at the slot being left.
    pub fn advance_slot(&mut self, previous_block_root: B256) -> Result<(), BeaconStateError> {
        self.slot += 1;
        self.latest_block_roots[((self.slot - 1) % LATEST_BLOCK_ROOTS_LENGTH) as usize] =
            previous_block_root;

        if self.slot % LATEST_BLOCK_ROOTS_LENGTH == 0 {
            let batched_root =
                SparseMerkleTree::new(&self.latest_block_roots, LATEST_BLOCK_ROOTS_TREE_DEPTH)
                    .map_err(|err| BeaconStateError::Merkle(err.to_string()))?
                    .root();
            self.batched_block_roots.push(batched_root)?;
            trace!(slot = self.slot, ?batched_root, "Batched block roots");
        }

        Ok(())
    }
}
