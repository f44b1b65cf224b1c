//! Capabilities the orchestrator drives.
//!
//! The orchestrator never talks to a node directly. Each side effect goes through one of
//! these traits so the decision logic can run against a JSON-RPC node, a block explorer,
//! or an in-memory recorder in tests.

mod backend;
mod coordinator;
mod verifier;

pub use backend::ContractBackend;
pub use coordinator::{CoordinatorMock, SubscriptionCreated};
pub use verifier::SourceVerifier;
