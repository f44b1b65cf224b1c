//! Results of deployment steps.

use alloy_core::primitives::{Address, B256};
use serde::{Deserialize, Serialize};

use crate::{ConstructorArgs, SubscriptionCreated};

/// A confirmed contract deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// Name of the deployed contract artifact.
    pub contract: String,
    /// Address the contract was deployed at.
    pub address: Address,
    /// Hash of the creation transaction.
    pub transaction_hash: B256,
    /// Block the creation transaction was included in.
    pub block_number: u64,
    /// Number of confirmations observed when the wait resolved.
    pub confirmations: u64,
}

/// Where the coordinator and subscription used by the raffle came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum SubscriptionHandle {
    /// Created and funded against the mock coordinator during this run.
    Mock {
        coordinator: Address,
        created: SubscriptionCreated,
        fund_tx: B256,
    },
    /// Read from the network profile and assumed to be funded already.
    Configured {
        coordinator: Address,
        subscription_id: u64,
    },
}

impl SubscriptionHandle {
    pub fn coordinator(&self) -> Address {
        match self {
            Self::Mock { coordinator, .. } | Self::Configured { coordinator, .. } => *coordinator,
        }
    }

    pub fn subscription_id(&self) -> u64 {
        match self {
            Self::Mock { created, .. } => created.subscription_id,
            Self::Configured {
                subscription_id, ..
            } => *subscription_id,
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self, Self::Mock { .. })
    }
}

/// Outcome of the verification step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum VerificationStatus {
    Verified,
    Skipped(String),
    Failed(String),
}

/// Everything a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentOutcome {
    /// Name of the resolved network profile.
    pub network: String,
    pub chain_id: u64,
    /// Whether the run took the simulated branch.
    pub simulated: bool,
    /// The mock coordinator deployment, on simulated networks.
    pub mock: Option<DeploymentRecord>,
    pub subscription: SubscriptionHandle,
    pub args: ConstructorArgs,
    pub raffle: DeploymentRecord,
    pub verification: VerificationStatus,
}
