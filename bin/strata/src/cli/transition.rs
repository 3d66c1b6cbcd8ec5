use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
pub struct TransitionConfig {
    #[arg(long, help = "SSZ encoded pre-state")]
    pub pre_state: PathBuf,

    #[arg(long, help = "SSZ encoded block")]
    pub block: PathBuf,

    #[arg(long, help = "Skip checking the block's state root against the post-state")]
    pub skip_state_root_check: bool,

    #[arg(long, short, help = "Write the SSZ encoded post-state to this file")]
    pub output: Option<PathBuf>,
}
