mod cli;

use std::fs;

use anyhow::{Context, anyhow};
use clap::Parser;
use ssz::{Decode, Encode};
use strata_bls::BlstBackend;
use strata_consensus::{
    beacon_block::BeaconBlock, beacon_state::BeaconState, state_transition::state_transition,
};
use strata_interop::{genesis::interop_genesis_state, keypairs::generate_deterministic_keypairs};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tree_hash::TreeHash;

use crate::cli::{Cli, Commands, genesis::GenesisConfig, transition::TransitionConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::builder().parse_lossy(cli.verbosity.directive()),
    };
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Genesis(config) => run_genesis(config).map(|_| ()),
        Commands::Transition(config) => run_transition(config).map(|_| ()),
    }
}

fn run_genesis(config: GenesisConfig) -> anyhow::Result<BeaconState> {
    info!(
        network = ?config.network.network,
        validator_count = config.validator_count(),
        "Generating interop genesis state"
    );

    let keypairs = generate_deterministic_keypairs(config.validator_count())?;
    let state = interop_genesis_state(
        &keypairs,
        config.genesis_time(),
        config.network.eth1_block_hash,
        &BlstBackend,
    )?;
    info!(state_root = %state.tree_hash_root(), slot = state.slot, "Genesis state ready");

    if let Some(path) = &config.output {
        fs::write(path, state.as_ssz_bytes())
            .with_context(|| format!("Failed to write genesis state to {}", path.display()))?;
        info!("Wrote genesis state to {}", path.display());
    }

    Ok(state)
}

fn run_transition(config: TransitionConfig) -> anyhow::Result<BeaconState> {
    let pre_state = fs::read(&config.pre_state)
        .with_context(|| format!("Failed to read pre-state {}", config.pre_state.display()))?;
    let pre_state = BeaconState::from_ssz_bytes(&pre_state)
        .map_err(|err| anyhow!("Failed to decode pre-state: {err:?}"))?;
    let block = fs::read(&config.block)
        .with_context(|| format!("Failed to read block {}", config.block.display()))?;
    let block = BeaconBlock::from_ssz_bytes(&block)
        .map_err(|err| anyhow!("Failed to decode block: {err:?}"))?;

    let post_state = state_transition(
        &pre_state,
        &block,
        &BlstBackend,
        !config.skip_state_root_check,
    )?;
    info!(
        slot = post_state.slot,
        state_root = %post_state.tree_hash_root(),
        "Applied block"
    );

    if let Some(path) = &config.output {
        fs::write(path, post_state.as_ssz_bytes())
            .with_context(|| format!("Failed to write post-state to {}", path.display()))?;
        info!("Wrote post-state to {}", path.display());
    }

    Ok(post_state)
}
