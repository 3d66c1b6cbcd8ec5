use strata_bls::{PrivateKey, PubKey};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keypair {
    pub private_key: PrivateKey,
    pub public_key: PubKey,
}

/// Derive the keypair of validator ``index``.
///
/// The input keying material is ``index + 1`` as 32 little-endian bytes, so no validator is keyed
/// from an all-zero seed.
pub fn generate_deterministic_keypair(index: u64) -> anyhow::Result<Keypair> {
    let mut ikm = [0u8; 32];
    ikm[..8].copy_from_slice(&index.wrapping_add(1).to_le_bytes());
    let private_key = PrivateKey::from_ikm(&ikm)?;
    let public_key = private_key.public_key()?;
    Ok(Keypair {
        private_key,
        public_key,
    })
}

/// Keypairs for validators ``0..count``.
pub fn generate_deterministic_keypairs(count: u64) -> anyhow::Result<Vec<Keypair>> {
    debug!(count, "Generating deterministic keypairs");
    (0..count).map(generate_deterministic_keypair).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypairs_are_deterministic() {
        let keypairs = generate_deterministic_keypairs(4).unwrap();

        assert_eq!(keypairs.len(), 4);
        assert_eq!(keypairs[2], generate_deterministic_keypair(2).unwrap());
        assert_eq!(
            keypairs[2].public_key,
            keypairs[2].private_key.public_key().unwrap()
        );
    }

    #[test]
    fn test_keypairs_are_distinct() {
        let keypairs = generate_deterministic_keypairs(8).unwrap();

        for (i, a) in keypairs.iter().enumerate() {
            for b in &keypairs[i + 1..] {
                assert_ne!(a.public_key, b.public_key);
            }
        }
    }
}
