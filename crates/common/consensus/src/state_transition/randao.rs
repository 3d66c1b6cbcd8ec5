use ethereum_hashing::hash_fixed;
use strata_bls::{BLSSignature, SignatureBackend};
use tree_hash::TreeHash;

use crate::{
    beacon_state::BeaconState,
    constants::{DOMAIN_RANDAO, LATEST_RANDAO_MIXES_LENGTH},
    errors::{BlockInvalid, BlockProcessingError},
    misc::xor,
};

impl BeaconState {
    /// Verify the proposer's RANDAO reveal for the current epoch and mix it into the current
    /// randao mix.
    pub fn process_randao(
        &mut self,
        randao_reveal: &BLSSignature,
        backend: &impl SignatureBackend,
    ) -> Result<(), BlockProcessingError> {
        let epoch = self.get_current_epoch();
        let proposer = self.get_validator(self.get_beacon_proposer_index(self.slot)?)?;

        let is_valid = backend
            .verify(
                &proposer.pubkey,
                epoch.tree_hash_root(),
                randao_reveal,
                self.get_domain(epoch, DOMAIN_RANDAO),
            )
            .map_err(|err| BlockProcessingError::BeaconState(err.into()))?;
        if !is_valid {
            return Err(BlockInvalid::BadRandaoSignature.into());
        }

        // Mix in RANDAO reveal
        let mix = xor(
            self.get_randao_mix(epoch).as_slice(),
            &hash_fixed(randao_reveal.to_bytes()),
        );
        self.latest_randao_mixes[(epoch % LATEST_RANDAO_MIXES_LENGTH) as usize] = mix;

        Ok(())
    }
}
