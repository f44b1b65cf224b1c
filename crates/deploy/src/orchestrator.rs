//! Sequencing of a raffle deployment run.
//!
//! The run moves through a fixed set of stages:
//!
//! ```text
//! ResolvingConfig -> ProvisioningMock | SkippingMock -> ProvisioningSubscription
//!     -> Deploying -> Verifying | SkippingVerify -> Done
//! ```
//!
//! Any error moves the run to `Failed` and is returned unchanged. Each step only starts
//! after the previous one has been confirmed on-chain.

use alloy_core::primitives::U256;

use crate::{
    ConstructorArgs, ContractBackend, CoordinatorMock, DeployError, DeploymentOutcome,
    NetworkRegistry, NetworkTarget, SimulatedNetworks, SourceVerifier, VerificationStatus,
    services::{
        ContractDeployer, MockInfrastructureProvisioner, SUBSCRIPTION_FUND_AMOUNT,
        SubscriptionProvisioner, VerificationTrigger,
    },
};

/// Label of the transport call reported when the chain ID cannot be queried.
pub const CHAIN_ID_QUERY: &str = "eth_chainId";

/// A state of the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Stage {
    ResolvingConfig,
    ProvisioningMock,
    SkippingMock,
    ProvisioningSubscription,
    Deploying,
    Verifying,
    SkippingVerify,
    Done,
    Failed,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// One-shot deployment of the raffle and its VRF dependencies.
///
/// `verifier` is only set when a verification credential is configured.
pub struct Orchestrator<'a, B, C, V> {
    registry: &'a NetworkRegistry,
    simulated_networks: &'a SimulatedNetworks,
    backend: &'a B,
    coordinator: &'a C,
    verifier: Option<&'a V>,
    fund_amount: U256,
    stages: Vec<Stage>,
}

impl<'a, B, C, V> Orchestrator<'a, B, C, V>
where
    B: ContractBackend,
    C: CoordinatorMock,
    V: SourceVerifier,
{
    pub fn new(
        registry: &'a NetworkRegistry,
        simulated_networks: &'a SimulatedNetworks,
        backend: &'a B,
        coordinator: &'a C,
        verifier: Option<&'a V>,
    ) -> Self {
        Self {
            registry,
            simulated_networks,
            backend,
            coordinator,
            verifier,
            fund_amount: SUBSCRIPTION_FUND_AMOUNT,
            stages: Vec::new(),
        }
    }

    /// Override the amount mock subscriptions are funded with.
    pub fn fund_amount(mut self, amount: U256) -> Self {
        self.fund_amount = amount;
        self
    }

    /// Every stage entered so far, in order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The current stage, if the run has started.
    pub fn stage(&self) -> Option<Stage> {
        self.stages.last().copied()
    }

    fn enter(&mut self, stage: Stage) {
        tracing::debug!(%stage, "Entering stage");
        self.stages.push(stage);
    }

    /// Run the deployment against `target`.
    pub async fn run(&mut self, target: &NetworkTarget) -> Result<DeploymentOutcome, DeployError> {
        match self.execute(target).await {
            Ok(outcome) => {
                self.enter(Stage::Done);
                Ok(outcome)
            }
            Err(err) => {
                tracing::error!(
                    stage = %self.stage().unwrap_or(Stage::ResolvingConfig),
                    error = %err,
                    "Deployment run failed"
                );
                self.enter(Stage::Failed);
                Err(err)
            }
        }
    }

    async fn execute(&mut self, target: &NetworkTarget) -> Result<DeploymentOutcome, DeployError> {
        self.enter(Stage::ResolvingConfig);

        let profile = self.registry.resolve(target.chain_id)?.clone();

        let actual = self.backend.chain_id().await.map_err(|e| {
            DeployError::deployment(
                CHAIN_ID_QUERY,
                e.context("Failed to query chain ID from transport"),
            )
        })?;
        if actual != target.chain_id {
            return Err(DeployError::ChainIdMismatch {
                expected: target.chain_id,
                actual,
            });
        }

        // Decided once, reused for both the mock and the verification branch.
        let simulated = self.simulated_networks.contains(&target.name);

        tracing::info!(
            network = %target.name,
            chain_id = target.chain_id,
            profile = %profile.name,
            simulated,
            "Network resolved"
        );

        let mock = if simulated {
            self.enter(Stage::ProvisioningMock);
            Some(
                MockInfrastructureProvisioner::new(self.backend)
                    .provision(&profile)
                    .await?,
            )
        } else {
            self.enter(Stage::SkippingMock);
            None
        };

        self.enter(Stage::ProvisioningSubscription);
        let subscription = match &mock {
            Some(record) => {
                SubscriptionProvisioner::new(self.coordinator)
                    .fund_amount(self.fund_amount)
                    .provision_mock(record.address)
                    .await?
            }
            None => SubscriptionProvisioner::<C>::resolve_configured(target.chain_id, &profile)?,
        };

        self.enter(Stage::Deploying);
        let deployer = ContractDeployer::new(self.backend, target.block_confirmations);
        let args: ConstructorArgs = ContractDeployer::<B>::assemble(&profile, &subscription).into();
        let raffle = deployer.deploy(&args).await?;

        let verifier = self.verifier;
        let verification = match verifier {
            Some(verifier) if !simulated => {
                self.enter(Stage::Verifying);
                VerificationTrigger::new(verifier)
                    .verify(raffle.address, &args)
                    .await
            }
            Some(_) => {
                self.enter(Stage::SkippingVerify);
                VerificationStatus::Skipped("simulated network".to_string())
            }
            None => {
                self.enter(Stage::SkippingVerify);
                VerificationStatus::Skipped("no verification credential".to_string())
            }
        };

        tracing::info!(
            network = %target.name,
            raffle = %raffle.address,
            subscription_id = subscription.subscription_id(),
            ?verification,
            "Deployment run complete"
        );

        Ok(DeploymentOutcome {
            network: profile.name,
            chain_id: target.chain_id,
            simulated,
            mock,
            subscription,
            args,
            raffle,
            verification,
        })
    }
}
