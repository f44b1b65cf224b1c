//! Network profiles and the chain-ID keyed registry.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::LazyLock,
};

use alloy_core::primitives::{Address, B256, U256, address, b256};
use derive_more::Deref;
use serde::{Deserialize, Serialize};

use crate::DeployError;

/// Chain ID of the local Hardhat/Anvil network.
pub const HARDHAT_CHAIN_ID: u64 = 31337;
/// Chain ID of Goerli.
///
/// Older Hardhat configs keyed this profile as `4` (Rinkeby's ID); chain `4` has no
/// built-in profile here.
pub const GOERLI_CHAIN_ID: u64 = 5;
/// Chain ID of Sepolia.
pub const SEPOLIA_CHAIN_ID: u64 = 11155111;

/// Base fee charged by the mock coordinator per request (0.25 LINK).
pub const DEFAULT_MOCK_BASE_FEE: U256 = U256::from_limbs([250_000_000_000_000_000, 0, 0, 0]);
/// Gas price in LINK used by the mock coordinator (1 gwei).
pub const DEFAULT_MOCK_GAS_PRICE_LINK: U256 = U256::from_limbs([1_000_000_000, 0, 0, 0]);

const DEFAULT_ENTRANCE_FEE: U256 = U256::from_limbs([10_000_000_000_000_000, 0, 0, 0]);
const DEFAULT_CALLBACK_GAS_LIMIT: u32 = 500_000;
const DEFAULT_INTERVAL: U256 = U256::from_limbs([30, 0, 0, 0]);
const GOERLI_GAS_LANE: B256 =
    b256!("0x0476f9a745b61ea5c0ab224d3a6e4c99f0b02fce4da01143a4f70aa80ae76e8a");
const SEPOLIA_GAS_LANE: B256 =
    b256!("0x474e34a077df58807dbe9c96d3c009b23b3c6d0cce433e59bbf5b34f823bc56c");

/// Names of the networks treated as local and ephemeral.
pub static SIMULATED_NETWORKS: LazyLock<SimulatedNetworks> =
    LazyLock::new(|| SimulatedNetworks::new(["hardhat", "localhost"]));

/// The built-in network table, shared for the whole process.
pub static BUILTIN_NETWORKS: LazyLock<NetworkRegistry> = LazyLock::new(NetworkRegistry::builtin);

/// The network a run targets, as named by the transport configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkTarget {
    /// Network name, checked against [`SIMULATED_NETWORKS`].
    pub name: String,
    /// Chain ID used to look up the [`NetworkProfile`].
    pub chain_id: u64,
    /// Confirmations to wait for the raffle deployment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_confirmations: Option<u64>,
}

impl NetworkTarget {
    pub fn new(name: impl Into<String>, chain_id: u64) -> Self {
        Self {
            name: name.into(),
            chain_id,
            block_confirmations: None,
        }
    }

    pub fn block_confirmations(mut self, confirmations: u64) -> Self {
        self.block_confirmations = Some(confirmations);
        self
    }
}

/// Static deployment parameters for one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProfile {
    /// Human-readable name.
    pub name: String,
    /// Address of the VRF coordinator. Only set for live networks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vrf_coordinator: Option<Address>,
    /// Fee a player pays to enter the raffle, in wei.
    pub entrance_fee: U256,
    /// Base fee of the coordinator, used when a mock is deployed.
    #[serde(default = "default_base_fee")]
    pub base_fee: U256,
    /// LINK-denominated gas price of the coordinator, used when a mock is deployed.
    #[serde(default = "default_gas_price_link")]
    pub gas_price_link: U256,
    /// Key hash selecting the VRF gas lane.
    pub gas_lane: B256,
    /// Gas limit for the randomness callback.
    pub callback_gas_limit: u32,
    /// Pre-funded VRF subscription. Only set for live networks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<u64>,
    /// Seconds between raffle draws.
    pub interval: U256,
}

fn default_base_fee() -> U256 {
    DEFAULT_MOCK_BASE_FEE
}

fn default_gas_price_link() -> U256 {
    DEFAULT_MOCK_GAS_PRICE_LINK
}

/// Partial profile read from a config file, applied on top of the built-in table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vrf_coordinator: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrance_fee: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_fee: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price_link: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_lane: Option<B256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_gas_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<U256>,
}

impl ProfileOverride {
    fn apply(self, profile: &mut NetworkProfile) {
        if let Some(name) = self.name {
            profile.name = name;
        }
        if let Some(coordinator) = self.vrf_coordinator {
            profile.vrf_coordinator = Some(coordinator);
        }
        if let Some(fee) = self.entrance_fee {
            profile.entrance_fee = fee;
        }
        if let Some(base_fee) = self.base_fee {
            profile.base_fee = base_fee;
        }
        if let Some(price) = self.gas_price_link {
            profile.gas_price_link = price;
        }
        if let Some(lane) = self.gas_lane {
            profile.gas_lane = lane;
        }
        if let Some(limit) = self.callback_gas_limit {
            profile.callback_gas_limit = limit;
        }
        if let Some(id) = self.subscription_id {
            profile.subscription_id = Some(id);
        }
        if let Some(interval) = self.interval {
            profile.interval = interval;
        }
    }

    /// Build a profile for a chain absent from the built-in table.
    fn into_profile(self, chain_id: u64) -> Result<NetworkProfile, DeployError> {
        let missing =
            |field: &str| DeployError::missing(chain_id, format!("`{field}` is required"));

        Ok(NetworkProfile {
            name: self.name.ok_or_else(|| missing("name"))?,
            vrf_coordinator: self.vrf_coordinator,
            entrance_fee: self.entrance_fee.ok_or_else(|| missing("entrance_fee"))?,
            base_fee: self.base_fee.unwrap_or(DEFAULT_MOCK_BASE_FEE),
            gas_price_link: self.gas_price_link.unwrap_or(DEFAULT_MOCK_GAS_PRICE_LINK),
            gas_lane: self.gas_lane.ok_or_else(|| missing("gas_lane"))?,
            callback_gas_limit: self
                .callback_gas_limit
                .ok_or_else(|| missing("callback_gas_limit"))?,
            subscription_id: self.subscription_id,
            interval: self.interval.ok_or_else(|| missing("interval"))?,
        })
    }
}

/// The set of network names that get mocked infrastructure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedNetworks(BTreeSet<String>);

impl SimulatedNetworks {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, network: &str) -> bool {
        self.0.contains(network)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Lookup table from chain ID to [`NetworkProfile`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct NetworkRegistry {
    #[deref]
    profiles: BTreeMap<u64, NetworkProfile>,
}

impl NetworkRegistry {
    /// The networks known without any configuration.
    pub fn builtin() -> Self {
        let mut profiles = BTreeMap::new();

        profiles.insert(
            HARDHAT_CHAIN_ID,
            NetworkProfile {
                name: "hardhat".to_string(),
                vrf_coordinator: None,
                entrance_fee: DEFAULT_ENTRANCE_FEE,
                base_fee: DEFAULT_MOCK_BASE_FEE,
                gas_price_link: DEFAULT_MOCK_GAS_PRICE_LINK,
                gas_lane: GOERLI_GAS_LANE,
                callback_gas_limit: DEFAULT_CALLBACK_GAS_LIMIT,
                subscription_id: None,
                interval: DEFAULT_INTERVAL,
            },
        );

        profiles.insert(
            GOERLI_CHAIN_ID,
            NetworkProfile {
                name: "goerli".to_string(),
                vrf_coordinator: Some(address!("0x2bce784e69d2Ff36c71edcB9F88358dB0DfB55b4")),
                entrance_fee: DEFAULT_ENTRANCE_FEE,
                base_fee: DEFAULT_MOCK_BASE_FEE,
                gas_price_link: DEFAULT_MOCK_GAS_PRICE_LINK,
                gas_lane: GOERLI_GAS_LANE,
                callback_gas_limit: DEFAULT_CALLBACK_GAS_LIMIT,
                subscription_id: Some(0),
                interval: DEFAULT_INTERVAL,
            },
        );

        // The subscription must come from the config file: there is no shared one on Sepolia.
        profiles.insert(
            SEPOLIA_CHAIN_ID,
            NetworkProfile {
                name: "sepolia".to_string(),
                vrf_coordinator: Some(address!("0x8103B0A8A00be2DDC778e6e7eaa21791Cd364625")),
                entrance_fee: DEFAULT_ENTRANCE_FEE,
                base_fee: DEFAULT_MOCK_BASE_FEE,
                gas_price_link: DEFAULT_MOCK_GAS_PRICE_LINK,
                gas_lane: SEPOLIA_GAS_LANE,
                callback_gas_limit: DEFAULT_CALLBACK_GAS_LIMIT,
                subscription_id: None,
                interval: DEFAULT_INTERVAL,
            },
        );

        Self { profiles }
    }

    /// Create a registry from explicit profiles.
    pub fn from_profiles(profiles: impl IntoIterator<Item = (u64, NetworkProfile)>) -> Self {
        Self {
            profiles: profiles.into_iter().collect(),
        }
    }

    /// Return a copy of this registry with config-file overrides merged in.
    ///
    /// Keys are decimal chain IDs. Overrides for unknown chains must carry every
    /// required field.
    pub fn with_overrides(
        &self,
        overrides: &BTreeMap<String, ProfileOverride>,
    ) -> Result<Self, DeployError> {
        let mut profiles = self.profiles.clone();

        for (key, over) in overrides {
            let chain_id: u64 = key.trim().parse().map_err(|_| {
                DeployError::missing(0, format!("invalid chain ID key `{key}` in networks table"))
            })?;

            match profiles.get_mut(&chain_id) {
                Some(profile) => over.clone().apply(profile),
                None => {
                    let profile = over.clone().into_profile(chain_id)?;
                    profiles.insert(chain_id, profile);
                }
            }
        }

        Ok(Self { profiles })
    }

    /// Look up the profile for a chain ID.
    pub fn resolve(&self, chain_id: u64) -> Result<&NetworkProfile, DeployError> {
        self.profiles
            .get(&chain_id)
            .ok_or_else(|| DeployError::missing(chain_id, "no network profile"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_simulated_and_live_profiles() {
        let hardhat = BUILTIN_NETWORKS.resolve(HARDHAT_CHAIN_ID).unwrap();
        assert_eq!(hardhat.name, "hardhat");
        assert!(hardhat.vrf_coordinator.is_none());
        assert!(hardhat.subscription_id.is_none());

        let goerli = BUILTIN_NETWORKS.resolve(GOERLI_CHAIN_ID).unwrap();
        assert!(goerli.vrf_coordinator.is_some());
        assert_eq!(goerli.subscription_id, Some(0));
    }

    #[test]
    fn test_resolve_unknown_chain_fails() {
        for chain_id in [0, 1, 4, 137, 424242] {
            let err = BUILTIN_NETWORKS.resolve(chain_id).unwrap_err();
            assert!(matches!(
                err,
                DeployError::ConfigurationMissing { chain_id: id, .. } if id == chain_id
            ));
        }
    }

    #[test]
    fn test_goerli_keyed_by_its_chain_id() {
        assert_eq!(BUILTIN_NETWORKS.resolve(GOERLI_CHAIN_ID).unwrap().name, "goerli");
        assert!(BUILTIN_NETWORKS.resolve(4).is_err());
    }

    #[test]
    fn test_default_values() {
        let hardhat = BUILTIN_NETWORKS.resolve(HARDHAT_CHAIN_ID).unwrap();
        assert_eq!(hardhat.entrance_fee, U256::from(10_000_000_000_000_000u64));
        assert_eq!(hardhat.base_fee, U256::from(250_000_000_000_000_000u64));
        assert_eq!(hardhat.gas_price_link, U256::from(1_000_000_000u64));
        assert_eq!(hardhat.callback_gas_limit, 500_000);
        assert_eq!(hardhat.interval, U256::from(30));
    }

    #[test]
    fn test_simulated_networks() {
        assert!(SIMULATED_NETWORKS.contains("hardhat"));
        assert!(SIMULATED_NETWORKS.contains("localhost"));
        assert!(!SIMULATED_NETWORKS.contains("sepolia"));
        assert!(!SIMULATED_NETWORKS.contains("Hardhat"));
    }

    #[test]
    fn test_override_existing_profile() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            SEPOLIA_CHAIN_ID.to_string(),
            ProfileOverride {
                subscription_id: Some(1234),
                ..Default::default()
            },
        );

        let registry = BUILTIN_NETWORKS.with_overrides(&overrides).unwrap();
        let sepolia = registry.resolve(SEPOLIA_CHAIN_ID).unwrap();
        assert_eq!(sepolia.subscription_id, Some(1234));
        assert_eq!(sepolia.name, "sepolia");

        // The shared table is untouched.
        assert!(
            BUILTIN_NETWORKS
                .resolve(SEPOLIA_CHAIN_ID)
                .unwrap()
                .subscription_id
                .is_none()
        );
    }

    #[test]
    fn test_override_new_profile_requires_fields() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "80002".to_string(),
            ProfileOverride {
                name: Some("amoy".to_string()),
                ..Default::default()
            },
        );

        let err = BUILTIN_NETWORKS.with_overrides(&overrides).unwrap_err();
        assert!(matches!(err, DeployError::ConfigurationMissing { chain_id: 80002, .. }));
    }

    #[test]
    fn test_override_new_complete_profile() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "80002".to_string(),
            ProfileOverride {
                name: Some("amoy".to_string()),
                vrf_coordinator: Some(Address::repeat_byte(0x11)),
                entrance_fee: Some(U256::from(1)),
                gas_lane: Some(B256::repeat_byte(0x22)),
                callback_gas_limit: Some(100_000),
                subscription_id: Some(7),
                interval: Some(U256::from(60)),
                ..Default::default()
            },
        );

        let registry = BUILTIN_NETWORKS.with_overrides(&overrides).unwrap();
        let amoy = registry.resolve(80002).unwrap();
        assert_eq!(amoy.base_fee, DEFAULT_MOCK_BASE_FEE);
        assert_eq!(amoy.subscription_id, Some(7));
    }

    #[test]
    fn test_override_rejects_bad_key() {
        let mut overrides = BTreeMap::new();
        overrides.insert("sepolia".to_string(), ProfileOverride::default());
        assert!(BUILTIN_NETWORKS.with_overrides(&overrides).is_err());
    }
}
