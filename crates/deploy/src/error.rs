//! Error taxonomy for a deployment run.

use thiserror::Error;

/// Errors surfaced by the deployment orchestrator.
///
/// Every variant except [`DeployError::VerificationFailed`] is fatal and aborts the run.
/// Verification failures are reported by the orchestrator as a warning and never returned
/// from [`crate::Orchestrator::run`].
#[derive(Debug, Error)]
pub enum DeployError {
    /// No profile for the chain ID, or a field required on the live path is absent.
    #[error("Configuration missing for chain {chain_id}: {what}")]
    ConfigurationMissing { chain_id: u64, what: String },

    /// The transport is connected to a different chain than the one configured.
    #[error("Chain ID mismatch: configured {expected}, transport reports {actual}")]
    ChainIdMismatch { expected: u64, actual: u64 },

    /// The `SubscriptionCreated` event was not found in the creation receipt.
    #[error("Subscription creation failed: {0}")]
    SubscriptionCreationFailed(String),

    /// The deploy capability errored or the transaction could not be confirmed.
    #[error("Deployment of {contract} failed")]
    DeploymentFailed {
        contract: String,
        #[source]
        source: anyhow::Error,
    },

    /// The block explorer rejected or could not process the verification request.
    #[error("Verification of {address} failed")]
    VerificationFailed {
        address: String,
        #[source]
        source: anyhow::Error,
    },
}

impl DeployError {
    pub(crate) fn missing(chain_id: u64, what: impl Into<String>) -> Self {
        Self::ConfigurationMissing {
            chain_id,
            what: what.into(),
        }
    }

    pub(crate) fn deployment(contract: impl Into<String>, source: anyhow::Error) -> Self {
        Self::DeploymentFailed {
            contract: contract.into(),
            source,
        }
    }

    /// Whether this error must abort the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::VerificationFailed { .. })
    }
}
