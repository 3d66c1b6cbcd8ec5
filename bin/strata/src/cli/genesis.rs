use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use strata_network_spec::{cli::network_parser, networks::NetworkSpec};

const DEFAULT_NETWORK: &str = "dev";

#[derive(Debug, Parser)]
pub struct GenesisConfig {
    #[arg(
        long,
        help = "Choose dev, minimal, or a path to a network YAML file",
        default_value = DEFAULT_NETWORK,
        value_parser = network_parser
    )]
    pub network: Arc<NetworkSpec>,

    #[arg(long, help = "Override the number of genesis validators")]
    pub validator_count: Option<u64>,

    #[arg(long, help = "Override the genesis time")]
    pub genesis_time: Option<u64>,

    #[arg(long, short, help = "Write the SSZ encoded genesis state to this file")]
    pub output: Option<PathBuf>,
}

impl GenesisConfig {
    pub fn validator_count(&self) -> u64 {
        self.validator_count
            .unwrap_or(self.network.genesis_validator_count)
    }

    pub fn genesis_time(&self) -> u64 {
        self.genesis_time.unwrap_or(self.network.genesis_time)
    }
}
