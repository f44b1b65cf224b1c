//! raffle-deploy - Deployment library for the VRF-backed Raffle contract.
//!
//! This crate resolves per-network configuration, provisions a mock VRF coordinator and a
//! funded subscription on local networks, deploys the raffle, and submits it for source
//! verification on live networks.
//!
//! # Example
//!
//! ```no_run
//! use raffle_deploy::{DeployConfig, EtherscanVerifier, Orchestrator, SIMULATED_NETWORKS};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = DeployConfig::load(None)?;
//! let registry = config.registry()?;
//! let chain = config.rpc_chain()?;
//!
//! let outcome = Orchestrator::<_, _, EtherscanVerifier>::new(
//!     &registry,
//!     &SIMULATED_NETWORKS,
//!     &chain,
//!     &chain,
//!     None,
//! )
//! .run(&config.target())
//! .await?;
//!
//! println!("Raffle deployed at {}", outcome.raffle.address);
//! # Ok(())
//! # }
//! ```

mod args;
mod artifacts;
mod chain;
mod config;
mod error;
mod etherscan;
mod network;
mod orchestrator;
mod record;
pub mod rpc;
pub mod services;
mod traits;

pub use args::{ConstructorArg, ConstructorArgs, RaffleArgs};
pub use artifacts::ArtifactStore;
pub use chain::{
    DEFAULT_CONFIRMATION_TIMEOUT, DEFAULT_POLL_INTERVAL, RpcChain, decode_subscription_created,
    encode_create_subscription, encode_fund_subscription, subscription_created_topic,
};
pub use config::{CONFIG_FILENAME, DeployConfig, ENV_PREFIX};
pub use error::DeployError;
pub use etherscan::{
    CompilerInput, DEFAULT_API_URL, DEFAULT_CONTRACT_NAME, EtherscanConfig, EtherscanVerifier,
};
pub use network::{
    BUILTIN_NETWORKS, DEFAULT_MOCK_BASE_FEE, DEFAULT_MOCK_GAS_PRICE_LINK, GOERLI_CHAIN_ID,
    HARDHAT_CHAIN_ID, NetworkProfile, NetworkRegistry, NetworkTarget, ProfileOverride,
    SEPOLIA_CHAIN_ID, SIMULATED_NETWORKS, SimulatedNetworks,
};
pub use orchestrator::{CHAIN_ID_QUERY, Orchestrator, Stage};
pub use record::{DeploymentOutcome, DeploymentRecord, SubscriptionHandle, VerificationStatus};
pub use services::{
    ContractDeployer, MOCK_COORDINATOR_CONTRACT, MockInfrastructureProvisioner, RAFFLE_CONTRACT,
    SUBSCRIPTION_FUND_AMOUNT, SubscriptionProvisioner, VerificationTrigger,
};
pub use traits::{ContractBackend, CoordinatorMock, SourceVerifier, SubscriptionCreated};
