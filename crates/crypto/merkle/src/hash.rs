use alloy_primitives::B256;

/// Common hashing function for Merkle trees.
pub(crate) fn hash_concat(h1: &[u8], h2: &[u8]) -> B256 {
    ethereum_hashing::hash32_concat(h1, h2).into()
}

/// ``zero_hashes[i]`` is the root of a subtree of height ``i`` whose leaves are all zero.
pub(crate) fn zero_hashes(depth: u64) -> Vec<B256> {
    let mut hashes = vec![B256::ZERO];
    for height in 0..depth as usize {
        let below = hashes[height];
        hashes.push(hash_concat(below.as_slice(), below.as_slice()));
    }
    hashes
}
