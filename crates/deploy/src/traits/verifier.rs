//! Source verification capability.

use std::future::Future;

use alloy_core::primitives::Address;
use anyhow::Result;

use crate::ConstructorArgs;

/// External service that verifies deployed source code.
pub trait SourceVerifier: Send + Sync {
    fn verify(
        &self,
        address: Address,
        args: &ConstructorArgs,
    ) -> impl Future<Output = Result<()>> + Send;
}
