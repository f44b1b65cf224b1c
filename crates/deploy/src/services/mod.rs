//! Deployment steps, one per component of the run.

pub mod contract;
pub mod mock;
pub mod subscription;
pub mod verify;

pub use contract::{ContractDeployer, RAFFLE_CONTRACT};
pub use mock::{MOCK_COORDINATOR_CONTRACT, MockInfrastructureProvisioner};
pub use subscription::{SUBSCRIPTION_FUND_AMOUNT, SubscriptionProvisioner};
pub use verify::VerificationTrigger;
