//! Best-effort source verification.

use alloy_core::primitives::Address;

use crate::{ConstructorArgs, DeployError, SourceVerifier, VerificationStatus};

/// Submits the deployed raffle to a block explorer.
///
/// Failures are logged and reported in the returned status; they never undo the deployment.
pub struct VerificationTrigger<'a, V> {
    verifier: &'a V,
}

impl<'a, V: SourceVerifier> VerificationTrigger<'a, V> {
    pub fn new(verifier: &'a V) -> Self {
        Self { verifier }
    }

    pub async fn verify(&self, address: Address, args: &ConstructorArgs) -> VerificationStatus {
        tracing::info!(address = %address, "Verifying...");

        match self.verifier.verify(address, args).await {
            Ok(()) => {
                tracing::info!(address = %address, "Contract verified");
                VerificationStatus::Verified
            }
            Err(source) => {
                let reason = format!("{source:#}");
                let err = DeployError::VerificationFailed {
                    address: address.to_string(),
                    source,
                };
                tracing::warn!(error = ?err, "Verification failed, deployment is kept");
                VerificationStatus::Failed(reason)
            }
        }
    }
}
