use alloy_primitives::B256;

pub const ACTIVATION_EXIT_DELAY: u64 = 4;
pub const BEACON_CHAIN_SHARD_NUMBER: u64 = u64::MAX;
pub const DEPOSIT_CONTRACT_TREE_DEPTH: u64 = 32;
pub const DOMAIN_ATTESTATION: u64 = 1;
pub const DOMAIN_DEPOSIT: u64 = 0;
pub const DOMAIN_EXIT: u64 = 3;
pub const DOMAIN_PROPOSAL: u64 = 2;
pub const DOMAIN_RANDAO: u64 = 4;
pub const FAR_FUTURE_EPOCH: u64 = u64::MAX;
pub const GENESIS_EPOCH: u64 = GENESIS_SLOT / SLOTS_PER_EPOCH;
pub const GENESIS_FORK_VERSION: u64 = 0;
pub const GENESIS_SLOT: u64 = 4294967296;
pub const GENESIS_START_SHARD: u64 = 0;
pub const LATEST_ACTIVE_INDEX_ROOTS_LENGTH: u64 = 8192;
pub const LATEST_BLOCK_ROOTS_LENGTH: u64 = 8192;
pub const LATEST_RANDAO_MIXES_LENGTH: u64 = 8192;
pub const LATEST_SLASHED_EXIT_LENGTH: u64 = 8192;
pub const MAX_ATTESTATIONS: u64 = 128;
pub const MAX_DEPOSIT_AMOUNT: u64 = 32_000_000_000;
pub const MAX_DEPOSITS: u64 = 16;
pub const MAX_PROPOSER_SLASHINGS: u64 = 16;
pub const MIN_ATTESTATION_INCLUSION_DELAY: u64 = 4;
pub const MIN_DEPOSIT_AMOUNT: u64 = 1_000_000_000;
pub const MIN_SEED_LOOKAHEAD: u64 = 1;
pub const SHARD_COUNT: u64 = 1024;
pub const SHUFFLE_ROUND_COUNT: u8 = 90;
pub const SLOTS_PER_EPOCH: u64 = 64;
pub const TARGET_COMMITTEE_SIZE: u64 = 128;
pub const WHISTLEBLOWER_REWARD_QUOTIENT: u64 = 512;
pub const ZERO_HASH: B256 = B256::ZERO;

/// Depth of the tree whose root is appended to ``batched_block_roots``.
pub const LATEST_BLOCK_ROOTS_TREE_DEPTH: u64 = LATEST_BLOCK_ROOTS_LENGTH.trailing_zeros() as u64;
