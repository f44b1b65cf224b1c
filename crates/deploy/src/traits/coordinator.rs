//! Mock VRF coordinator capability.

use std::future::Future;

use alloy_core::primitives::{Address, B256, U256};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Decoded `SubscriptionCreated(uint64 indexed subId, address owner)` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionCreated {
    pub subscription_id: u64,
    pub owner: Address,
}

/// Calls exposed by a deployed `VRFCoordinatorV2Mock`.
pub trait CoordinatorMock: Send + Sync {
    /// Call `createSubscription()` and wait for one confirmation.
    ///
    /// Returns `None` when the receipt holds no `SubscriptionCreated` event.
    fn create_subscription(
        &self,
        coordinator: Address,
    ) -> impl Future<Output = Result<Option<SubscriptionCreated>>> + Send;

    /// Call `fundSubscription(subId, amount)` and wait for one confirmation.
    ///
    /// Returns the transaction hash.
    fn fund_subscription(
        &self,
        coordinator: Address,
        subscription_id: u64,
        amount: U256,
    ) -> impl Future<Output = Result<B256>> + Send;
}
