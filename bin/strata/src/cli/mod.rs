pub mod genesis;
pub mod transition;
pub mod verbosity;

use clap::{Parser, Subcommand};

use crate::cli::{
    genesis::GenesisConfig,
    transition::TransitionConfig,
    verbosity::{Verbosity, verbosity_parser},
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (1=error, 2=warn, 3=info, 4=debug, 5=trace)
    #[arg(short, long, global = true, default_value = "3", value_parser = verbosity_parser)]
    pub verbosity: Verbosity,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build an interop genesis state
    #[command(name = "genesis")]
    Genesis(GenesisConfig),

    /// Apply a block to a state
    #[command(name = "transition")]
    Transition(TransitionConfig),
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use strata_network_spec::networks::Network;

    use super::*;

    #[test]
    fn test_cli_genesis_command() {
        let cli = Cli::parse_from([
            "program",
            "--verbosity",
            "4",
            "genesis",
            "--network",
            "minimal",
            "--validator-count",
            "64",
        ]);

        assert_eq!(cli.verbosity, Verbosity::Debug);
        match cli.command {
            Commands::Genesis(config) => {
                assert_eq!(config.network.network, Network::Minimal);
                assert_eq!(config.validator_count(), 64);
                assert_eq!(config.genesis_time(), config.network.genesis_time);
                assert_eq!(config.output, None);
            }
            Commands::Transition(_) => panic!("Expected the genesis command"),
        }
    }

    #[test]
    fn test_cli_transition_command() {
        let cli = Cli::parse_from([
            "program",
            "transition",
            "--pre-state",
            "pre.ssz",
            "--block",
            "block.ssz",
            "--skip-state-root-check",
        ]);

        assert_eq!(cli.verbosity, Verbosity::Info);
        match cli.command {
            Commands::Transition(config) => {
                assert_eq!(config.pre_state, PathBuf::from("pre.ssz"));
                assert_eq!(config.block, PathBuf::from("block.ssz"));
                assert!(config.skip_state_root_check);
            }
            Commands::Genesis(_) => panic!("Expected the transition command"),
        }
    }

    #[test]
    fn test_verbosity_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["program", "--verbosity", "9", "genesis"]).is_err());
    }
}
