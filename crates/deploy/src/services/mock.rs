//! Mock VRF coordinator for simulated networks.

use anyhow::Context;

use crate::{ConstructorArgs, ContractBackend, DeployError, DeploymentRecord, NetworkProfile};

/// Artifact name of the mock coordinator.
pub const MOCK_COORDINATOR_CONTRACT: &str = "VRFCoordinatorV2Mock";

/// Deploys `VRFCoordinatorV2Mock(baseFee, gasPriceLink)`.
pub struct MockInfrastructureProvisioner<'a, B> {
    backend: &'a B,
}

impl<'a, B: ContractBackend> MockInfrastructureProvisioner<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Deploy the mock with the fee parameters of `profile`.
    ///
    /// Only called on simulated networks. A failure is not retried.
    pub async fn provision(
        &self,
        profile: &NetworkProfile,
    ) -> Result<DeploymentRecord, DeployError> {
        tracing::info!(
            network = %profile.name,
            base_fee = %profile.base_fee,
            gas_price_link = %profile.gas_price_link,
            "Local network detected, deploying mock VRF coordinator..."
        );

        let args = ConstructorArgs::mock_coordinator(profile.base_fee, profile.gas_price_link)
            .map_err(|e| DeployError::deployment(MOCK_COORDINATOR_CONTRACT, e))?;

        let record = self
            .backend
            .deploy(MOCK_COORDINATOR_CONTRACT, &args, 1)
            .await
            .context("Failed to deploy mock VRF coordinator")
            .map_err(|e| DeployError::deployment(MOCK_COORDINATOR_CONTRACT, e))?;

        tracing::info!(
            address = %record.address,
            tx_hash = %record.transaction_hash,
            "Mock VRF coordinator deployed"
        );

        Ok(record)
    }
}
