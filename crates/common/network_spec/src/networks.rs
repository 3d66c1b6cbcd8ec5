use std::sync::{Arc, LazyLock};

use alloy_primitives::{B256, b256};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Network {
    Dev,
    Minimal,
    Custom(String),
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match String::deserialize(deserializer)?.as_str() {
            "dev" => Ok(Network::Dev),
            "minimal" => Ok(Network::Minimal),
            custom => Ok(Network::Custom(custom.to_string())),
        }
    }
}

/// Chain-start parameters of an interop network.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct NetworkSpec {
    #[serde(rename = "CONFIG_NAME")]
    pub network: Network,
    pub genesis_time: u64,
    pub genesis_validator_count: u64,
    #[serde(with = "serde_utils::b256_hex")]
    pub eth1_block_hash: B256,
}

pub static DEV: LazyLock<Arc<NetworkSpec>> = LazyLock::new(|| {
    NetworkSpec {
        network: Network::Dev,
        genesis_time: 1578009600,
        genesis_validator_count: 128,
        eth1_block_hash: b256!(
            "0x4242424242424242424242424242424242424242424242424242424242424242"
        ),
    }
    .into()
});

pub static MINIMAL: LazyLock<Arc<NetworkSpec>> = LazyLock::new(|| {
    NetworkSpec {
        network: Network::Minimal,
        genesis_time: 0,
        genesis_validator_count: 16,
        eth1_block_hash: B256::ZERO,
    }
    .into()
});
