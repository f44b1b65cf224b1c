use std::path::PathBuf;

use alloy_core::primitives::Address;
use clap::{Args, Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use url::Url;

#[derive(Parser)]
#[command(name = "raffle")]
#[command(
    author,
    version,
    about = "Deploy the Raffle contract and its VRF dependencies"
)]
pub struct Cli {
    /// The verbosity level.
    #[arg(
        short,
        long,
        global = true,
        env = "RAFFLE_VERBOSITY",
        default_value_t = LevelFilter::INFO
    )]
    pub verbosity: LevelFilter,

    /// Path to a Raffle.toml configuration file (or the directory containing it).
    #[arg(long, alias = "conf", global = true, env = "RAFFLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Deploy arguments, used when no subcommand is given.
    #[clap(flatten)]
    pub deploy: DeployArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The deploy arguments of this invocation, or `None` for non-deploy subcommands.
    ///
    /// `raffle` and `raffle deploy` are equivalent.
    pub fn into_deploy_args(self) -> Option<DeployArgs> {
        match self.command {
            None => Some(self.deploy),
            Some(Command::Deploy(args)) => Some(args),
            Some(Command::Networks) => None,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Deploy the raffle (default).
    Deploy(DeployArgs),
    /// List the known network profiles.
    Networks,
}

/// Overrides applied on top of the configuration file.
#[derive(Debug, Clone, Default, Args)]
pub struct DeployArgs {
    /// The target network name. `hardhat` and `localhost` get mocked infrastructure.
    #[arg(short, long, visible_alias = "name", env = "RAFFLE_NETWORK")]
    pub network: Option<String>,

    /// The chain ID of the target network.
    #[arg(long, env = "RAFFLE_CHAIN_ID")]
    pub chain_id: Option<u64>,

    /// The URL of the JSON-RPC endpoint.
    #[arg(long, alias = "rpc", env = "RAFFLE_RPC_URL")]
    pub rpc_url: Option<Url>,

    /// Confirmations to wait for the raffle deployment.
    #[arg(long, alias = "confirmations", env = "RAFFLE_BLOCK_CONFIRMATIONS")]
    pub block_confirmations: Option<u64>,

    /// Directory holding the compiled contract artifacts.
    #[arg(long, env = "RAFFLE_ARTIFACTS")]
    pub artifacts: Option<PathBuf>,

    /// Sender address. Defaults to the node's first account.
    #[arg(long, env = "RAFFLE_FROM")]
    pub from: Option<Address>,

    /// Block explorer API key. Verification is skipped without it.
    #[arg(long, env = "ETHERSCAN_API_KEY", hide_env_values = true)]
    pub etherscan_api_key: Option<String>,

    /// Hardhat build-info file used for verification.
    #[arg(long, env = "RAFFLE_BUILD_INFO")]
    pub build_info: Option<PathBuf>,

    /// Write the resolved configuration to this path before deploying.
    #[arg(long, env = "RAFFLE_SAVE_CONFIG")]
    pub save_config: Option<PathBuf>,
}
