use alloy_primitives::B256;
use blst::min_pk::SecretKey as BlstSecretKey;

use crate::{PrivateKey, PubKey, errors::BLSError};

impl PrivateKey {
    /// Derives a key from at least 32 bytes of input keying material (EIP-2333 `KeyGen`).
    pub fn from_ikm(ikm: &[u8]) -> Result<Self, BLSError> {
        let secret_key = BlstSecretKey::key_gen(ikm, &[])
            .map_err(|err| BLSError::BlstError(format!("{err:?}")))?;
        Ok(Self {
            inner: B256::from(secret_key.to_bytes()),
        })
    }

    pub fn to_blst_secret_key(&self) -> Result<BlstSecretKey, BLSError> {
        BlstSecretKey::from_bytes(self.inner.as_slice()).map_err(|_| BLSError::InvalidPrivateKey)
    }

    pub fn public_key(&self) -> Result<PubKey, BLSError> {
        Ok(self.to_blst_secret_key()?.sk_to_pk().into())
    }
}
