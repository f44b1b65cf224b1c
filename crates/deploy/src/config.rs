//! Run configuration, layered from defaults, a TOML file and the environment.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::Duration,
};

use alloy_core::primitives::Address;
use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    ArtifactStore, DeployError, EtherscanConfig, NetworkRegistry, NetworkTarget, ProfileOverride,
    RpcChain,
    network::{BUILTIN_NETWORKS, HARDHAT_CHAIN_ID},
};

/// The default name for the configuration file.
pub const CONFIG_FILENAME: &str = "Raffle.toml";

/// Prefix of the environment variables read into [`DeployConfig`].
pub const ENV_PREFIX: &str = "RAFFLE_";

/// Everything needed to run a deployment.
///
/// Serialized to/from TOML. Environment variables prefixed with `RAFFLE_` override the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Target network name. Decides between the simulated and the live branch.
    pub network: String,
    /// Chain ID of the target network, used as the profile key.
    pub chain_id: u64,
    /// JSON-RPC endpoint of the target network.
    pub rpc_url: Url,
    /// Confirmations to wait for the raffle deployment (1 when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_confirmations: Option<u64>,
    /// Sender account. Defaults to the node's first account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    /// Directory holding `<Contract>.json` artifacts.
    pub artifacts: PathBuf,
    /// Delay between receipt polls, in milliseconds.
    pub poll_interval_ms: u64,
    /// Maximum wait for a transaction's confirmations, in seconds.
    pub confirmation_timeout_secs: u64,
    /// Block explorer settings.
    #[serde(default)]
    pub etherscan: EtherscanConfig,
    /// Per-chain additions to the built-in network table, keyed by chain ID.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub networks: BTreeMap<String, ProfileOverride>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            network: "hardhat".to_string(),
            chain_id: HARDHAT_CHAIN_ID,
            rpc_url: Url::parse("http://127.0.0.1:8545/").expect("default RPC URL is valid"),
            block_confirmations: None,
            from: None,
            artifacts: PathBuf::from("artifacts"),
            poll_interval_ms: crate::chain::DEFAULT_POLL_INTERVAL.as_millis() as u64,
            confirmation_timeout_secs: crate::chain::DEFAULT_CONFIRMATION_TIMEOUT.as_secs(),
            etherscan: EtherscanConfig::default(),
            networks: BTreeMap::new(),
        }
    }
}

impl DeployConfig {
    /// Layer defaults, then `path` (if it exists), then `RAFFLE_*` environment variables.
    ///
    /// `path` may point to a file or to a directory containing [`CONFIG_FILENAME`].
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            let file = Self::resolve_path(path)?;
            tracing::debug!(path = %file.display(), "Reading configuration file");
            figment = figment.merge(Toml::file(file));
        }

        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to load deployment configuration")?;

        Ok(config)
    }

    fn resolve_path(path: &Path) -> Result<PathBuf> {
        if !path.exists() {
            anyhow::bail!("Configuration file or directory not found: {}", path.display());
        }

        Ok(if path.is_dir() {
            path.join(CONFIG_FILENAME)
        } else {
            path.to_path_buf()
        })
    }

    /// Save the configuration to a TOML file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize deploy config to TOML")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Load the configuration from a TOML file, without environment overrides.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let path = Self::resolve_path(path)?;
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).context("Failed to parse config file as TOML")?;
        tracing::info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// The network this configuration targets.
    pub fn target(&self) -> NetworkTarget {
        NetworkTarget {
            name: self.network.clone(),
            chain_id: self.chain_id,
            block_confirmations: self.block_confirmations,
        }
    }

    /// The built-in network table with this configuration's overrides applied.
    pub fn registry(&self) -> Result<NetworkRegistry, DeployError> {
        BUILTIN_NETWORKS.with_overrides(&self.networks)
    }

    /// JSON-RPC transport for this configuration.
    pub fn rpc_chain(&self) -> Result<RpcChain> {
        Ok(
            RpcChain::new(self.rpc_url.clone(), ArtifactStore::new(&self.artifacts))?
                .from(self.from)
                .poll_interval(Duration::from_millis(self.poll_interval_ms))
                .confirmation_timeout(Duration::from_secs(self.confirmation_timeout_secs)),
        )
    }
}
