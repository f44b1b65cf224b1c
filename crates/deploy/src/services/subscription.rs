//! VRF subscription provisioning.
//!
//! On simulated networks the subscription is created and funded on the freshly deployed
//! mock. On live networks both the coordinator and the subscription come from the profile
//! and must already exist; nothing is sent on-chain.

use alloy_core::primitives::{Address, U256};

use crate::{CoordinatorMock, DeployError, NetworkProfile, SubscriptionHandle};

/// Amount the mock subscription is funded with (2 LINK).
pub const SUBSCRIPTION_FUND_AMOUNT: U256 = U256::from_limbs([2_000_000_000_000_000_000, 0, 0, 0]);

pub struct SubscriptionProvisioner<'a, C> {
    coordinator: &'a C,
    fund_amount: U256,
}

impl<'a, C: CoordinatorMock> SubscriptionProvisioner<'a, C> {
    pub fn new(coordinator: &'a C) -> Self {
        Self {
            coordinator,
            fund_amount: SUBSCRIPTION_FUND_AMOUNT,
        }
    }

    /// Override the amount used to fund mock subscriptions.
    pub fn fund_amount(mut self, amount: U256) -> Self {
        self.fund_amount = amount;
        self
    }

    /// Create a subscription on the mock at `mock_address`, then fund it.
    ///
    /// Funding is only attempted once the creation event has been decoded.
    pub async fn provision_mock(
        &self,
        mock_address: Address,
    ) -> Result<SubscriptionHandle, DeployError> {
        tracing::info!(
            coordinator = %mock_address,
            "Creating VRF subscription on mock coordinator..."
        );

        let created = self
            .coordinator
            .create_subscription(mock_address)
            .await
            .map_err(|e| DeployError::SubscriptionCreationFailed(format!("{e:#}")))?
            .ok_or_else(|| {
                DeployError::SubscriptionCreationFailed(
                    "SubscriptionCreated event missing from receipt".to_string(),
                )
            })?;

        tracing::info!(
            subscription_id = created.subscription_id,
            owner = %created.owner,
            amount = %self.fund_amount,
            "Subscription created, funding..."
        );

        let fund_tx = self
            .coordinator
            .fund_subscription(mock_address, created.subscription_id, self.fund_amount)
            .await
            .map_err(|e| DeployError::deployment("fundSubscription", e))?;

        tracing::info!(
            subscription_id = created.subscription_id,
            tx_hash = %fund_tx,
            "Subscription funded"
        );

        Ok(SubscriptionHandle::Mock {
            coordinator: mock_address,
            created,
            fund_tx,
        })
    }

    /// Read the coordinator and subscription from a live network profile.
    pub fn resolve_configured(
        chain_id: u64,
        profile: &NetworkProfile,
    ) -> Result<SubscriptionHandle, DeployError> {
        let coordinator = profile
            .vrf_coordinator
            .ok_or_else(|| DeployError::missing(chain_id, "`vrf_coordinator` is not set"))?;
        let subscription_id = profile
            .subscription_id
            .ok_or_else(|| DeployError::missing(chain_id, "`subscription_id` is not set"))?;

        tracing::info!(
            network = %profile.name,
            coordinator = %coordinator,
            subscription_id,
            "Using configured VRF coordinator and subscription"
        );

        Ok(SubscriptionHandle::Configured {
            coordinator,
            subscription_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use alloy_core::primitives::B256;

    use super::*;
    use crate::{BUILTIN_NETWORKS, SubscriptionCreated, network::GOERLI_CHAIN_ID};

    #[derive(Default)]
    struct Recorder {
        emit_event: bool,
        calls: Mutex<Vec<String>>,
    }

    impl CoordinatorMock for Recorder {
        async fn create_subscription(
            &self,
            _coordinator: Address,
        ) -> anyhow::Result<Option<SubscriptionCreated>> {
            self.calls.lock().unwrap().push("create".to_string());
            Ok(self.emit_event.then_some(SubscriptionCreated {
                subscription_id: 1,
                owner: Address::ZERO,
            }))
        }

        async fn fund_subscription(
            &self,
            _coordinator: Address,
            subscription_id: u64,
            amount: U256,
        ) -> anyhow::Result<B256> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("fund:{subscription_id}:{amount}"));
            Ok(B256::repeat_byte(0xf0))
        }
    }

    #[tokio::test]
    async fn test_mock_path_creates_then_funds() {
        let recorder = Recorder {
            emit_event: true,
            ..Default::default()
        };
        let mock = Address::repeat_byte(0x01);

        let handle = SubscriptionProvisioner::new(&recorder)
            .provision_mock(mock)
            .await
            .unwrap();

        assert_eq!(handle.coordinator(), mock);
        assert_eq!(handle.subscription_id(), 1);
        assert!(handle.is_mock());
        assert_eq!(
            *recorder.calls.lock().unwrap(),
            vec![
                "create".to_string(),
                format!("fund:1:{}", SUBSCRIPTION_FUND_AMOUNT)
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_event_never_funds() {
        let recorder = Recorder::default();

        let err = SubscriptionProvisioner::new(&recorder)
            .provision_mock(Address::repeat_byte(0x01))
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::SubscriptionCreationFailed(_)));
        assert_eq!(*recorder.calls.lock().unwrap(), vec!["create".to_string()]);
    }

    #[test]
    fn test_fund_amount_is_two_link() {
        assert_eq!(
            SUBSCRIPTION_FUND_AMOUNT,
            U256::from(2u64) * U256::from(10u64).pow(U256::from(18))
        );
    }

    #[test]
    fn test_configured_path_reads_profile() {
        let profile = BUILTIN_NETWORKS.resolve(GOERLI_CHAIN_ID).unwrap();
        let handle =
            SubscriptionProvisioner::<Recorder>::resolve_configured(GOERLI_CHAIN_ID, profile)
                .unwrap();

        assert!(!handle.is_mock());
        assert_eq!(Some(handle.coordinator()), profile.vrf_coordinator);
        assert_eq!(handle.subscription_id(), 0);
    }

    #[test]
    fn test_configured_path_requires_subscription() {
        let mut profile = BUILTIN_NETWORKS.resolve(GOERLI_CHAIN_ID).unwrap().clone();
        profile.subscription_id = None;

        let err = SubscriptionProvisioner::<Recorder>::resolve_configured(GOERLI_CHAIN_ID, &profile)
            .unwrap_err();
        assert!(matches!(err, DeployError::ConfigurationMissing { .. }));
    }

    #[test]
    fn test_configured_path_requires_coordinator() {
        let mut profile = BUILTIN_NETWORKS.resolve(GOERLI_CHAIN_ID).unwrap().clone();
        profile.vrf_coordinator = None;

        let err = SubscriptionProvisioner::<Recorder>::resolve_configured(GOERLI_CHAIN_ID, &profile)
            .unwrap_err();
        assert!(matches!(err, DeployError::ConfigurationMissing { .. }));
    }
}
