//! Contract deployment capability.

use std::future::Future;

use anyhow::Result;

use crate::{ConstructorArgs, DeploymentRecord};

/// Transport able to deploy contracts and report which chain it is connected to.
pub trait ContractBackend: Send + Sync {
    /// The chain ID reported by the connected node.
    fn chain_id(&self) -> impl Future<Output = Result<u64>> + Send;

    /// Deploy `contract` with `args` and wait for `confirmations` blocks.
    ///
    /// Implementations own their retry and timeout policy; errors are treated as fatal.
    fn deploy(
        &self,
        contract: &str,
        args: &ConstructorArgs,
        confirmations: u64,
    ) -> impl Future<Output = Result<DeploymentRecord>> + Send;
}
