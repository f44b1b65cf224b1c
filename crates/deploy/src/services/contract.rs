//! Raffle contract deployment.

use anyhow::Context;

use crate::{
    ConstructorArgs, ContractBackend, DeployError, DeploymentRecord, NetworkProfile, RaffleArgs,
    SubscriptionHandle,
};

/// Artifact name of the raffle contract.
pub const RAFFLE_CONTRACT: &str = "Raffle";

/// Confirmations awaited when the network does not configure any.
pub const DEFAULT_BLOCK_CONFIRMATIONS: u64 = 1;

/// Assembles the raffle constructor arguments and deploys the contract.
pub struct ContractDeployer<'a, B> {
    backend: &'a B,
    block_confirmations: u64,
}

impl<'a, B: ContractBackend> ContractDeployer<'a, B> {
    /// Create a deployer waiting for `block_confirmations` (defaults to 1).
    pub fn new(backend: &'a B, block_confirmations: Option<u64>) -> Self {
        Self {
            backend,
            block_confirmations: block_confirmations.unwrap_or(DEFAULT_BLOCK_CONFIRMATIONS),
        }
    }

    /// Build the arguments in constructor order.
    ///
    /// Every field comes from `profile` or from the freshly resolved `subscription`.
    pub fn assemble(profile: &NetworkProfile, subscription: &SubscriptionHandle) -> RaffleArgs {
        RaffleArgs {
            vrf_coordinator: subscription.coordinator(),
            entrance_fee: profile.entrance_fee,
            gas_lane: profile.gas_lane,
            subscription_id: subscription.subscription_id(),
            callback_gas_limit: profile.callback_gas_limit,
            interval: profile.interval,
        }
    }

    /// Deploy the raffle with already assembled arguments.
    ///
    /// Errors from the backend are surfaced as [`DeployError::DeploymentFailed`] and not retried.
    pub async fn deploy(&self, args: &ConstructorArgs) -> Result<DeploymentRecord, DeployError> {
        tracing::info!(
            args = %args,
            confirmations = self.block_confirmations,
            "Deploying {RAFFLE_CONTRACT}..."
        );

        let record = self
            .backend
            .deploy(RAFFLE_CONTRACT, args, self.block_confirmations)
            .await
            .with_context(|| format!("Failed to deploy {RAFFLE_CONTRACT}"))
            .map_err(|e| DeployError::deployment(RAFFLE_CONTRACT, e))?;

        tracing::info!(
            address = %record.address,
            tx_hash = %record.transaction_hash,
            block = record.block_number,
            confirmations = record.confirmations,
            "{RAFFLE_CONTRACT} deployed"
        );

        Ok(record)
    }

    pub fn block_confirmations(&self) -> u64 {
        self.block_confirmations
    }
}
