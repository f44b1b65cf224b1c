//! JSON-RPC implementation of the deployment and mock coordinator capabilities.
//!
//! Transactions are sent with `eth_sendTransaction`, so the node must manage the sender
//! account (Hardhat, Anvil, or a signing proxy in front of a live endpoint).

use std::time::Duration;

use alloy_core::{
    primitives::{Address, B256, Bytes, U256, keccak256},
    sol_types::SolValue,
};
use anyhow::{Context, Result};
use url::Url;

use crate::{
    ArtifactStore, ConstructorArgs, ContractBackend, CoordinatorMock, DeploymentRecord,
    SubscriptionCreated,
    args::ensure_uint96,
    rpc::{self, ReceiptLog},
};

/// Default delay between receipt polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Default maximum wait for a transaction to reach its confirmations.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(600);

const CREATE_SUBSCRIPTION_SIG: &str = "createSubscription()";
const FUND_SUBSCRIPTION_SIG: &str = "fundSubscription(uint64,uint96)";
const SUBSCRIPTION_CREATED_SIG: &str = "SubscriptionCreated(uint64,address)";

/// 4-byte selector of a function signature.
fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Topic of the `SubscriptionCreated` event.
pub fn subscription_created_topic() -> B256 {
    keccak256(SUBSCRIPTION_CREATED_SIG.as_bytes())
}

/// Calldata for `createSubscription()`.
pub fn encode_create_subscription() -> Bytes {
    Bytes::copy_from_slice(&selector(CREATE_SUBSCRIPTION_SIG))
}

/// Calldata for `fundSubscription(uint64 subId, uint96 amount)`.
pub fn encode_fund_subscription(subscription_id: u64, amount: U256) -> Result<Bytes> {
    ensure_uint96(amount, "Funding amount")?;

    let mut data = selector(FUND_SUBSCRIPTION_SIG).to_vec();
    data.extend((subscription_id, amount).abi_encode_params());
    Ok(data.into())
}

/// Find and decode the `SubscriptionCreated` event emitted by `coordinator`.
///
/// `subId` is the first indexed topic and `owner` the only data word.
pub fn decode_subscription_created(
    logs: &[ReceiptLog],
    coordinator: Address,
) -> Result<Option<SubscriptionCreated>> {
    let topic = subscription_created_topic();

    let Some(log) = logs
        .iter()
        .find(|log| log.address == coordinator && log.topics.first() == Some(&topic))
    else {
        return Ok(None);
    };

    let raw_id = log
        .topics
        .get(1)
        .context("SubscriptionCreated event has no subId topic")?;
    let subscription_id = u64::try_from(U256::from_be_bytes(raw_id.0))
        .context("SubscriptionCreated subId does not fit in uint64")?;

    if log.data.len() < 32 {
        anyhow::bail!("SubscriptionCreated event data is too short");
    }
    let owner = Address::from_slice(&log.data[12..32]);

    Ok(Some(SubscriptionCreated {
        subscription_id,
        owner,
    }))
}

/// Node connection used for every on-chain step.
#[derive(Debug, Clone)]
pub struct RpcChain {
    client: reqwest::Client,
    url: Url,
    from: Option<Address>,
    artifacts: ArtifactStore,
    poll_interval: Duration,
    confirmation_timeout: Duration,
}

impl RpcChain {
    pub fn new(url: Url, artifacts: ArtifactStore) -> Result<Self> {
        Ok(Self {
            client: rpc::create_client()?,
            url,
            from: None,
            artifacts,
            poll_interval: DEFAULT_POLL_INTERVAL,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
        })
    }

    /// Send from this account instead of the node's first account.
    pub fn from(mut self, from: Option<Address>) -> Self {
        self.from = from;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn sender(&self) -> Result<Address> {
        if let Some(from) = self.from {
            return Ok(from);
        }

        let accounts: Vec<Address> =
            rpc::json_rpc_call(&self.client, self.url.as_str(), "eth_accounts", vec![])
                .await
                .context("Failed to list node accounts")?;

        accounts
            .first()
            .copied()
            .context("Node exposes no accounts and no sender address is configured")
    }

    async fn send_transaction(&self, to: Option<Address>, data: Bytes) -> Result<B256> {
        let from = self.sender().await?;

        let mut tx = serde_json::json!({
            "from": from,
            "data": data,
        });
        if let Some(to) = to {
            tx["to"] = serde_json::json!(to);
        }

        let tx_hash: B256 = rpc::json_rpc_call(
            &self.client,
            self.url.as_str(),
            "eth_sendTransaction",
            vec![tx],
        )
        .await
        .context("Failed to send transaction")?;

        tracing::debug!(tx_hash = %tx_hash, from = %from, ?to, "Transaction sent");

        Ok(tx_hash)
    }

    async fn wait(
        &self,
        tx_hash: B256,
        confirmations: u64,
    ) -> Result<(rpc::TransactionReceipt, u64)> {
        rpc::wait_for_confirmations(
            &self.client,
            self.url.as_str(),
            tx_hash,
            confirmations,
            self.poll_interval,
            self.confirmation_timeout,
        )
        .await
    }
}

impl ContractBackend for RpcChain {
    async fn chain_id(&self) -> Result<u64> {
        rpc::chain_id(&self.client, self.url.as_str()).await
    }

    async fn deploy(
        &self,
        contract: &str,
        args: &ConstructorArgs,
        confirmations: u64,
    ) -> Result<DeploymentRecord> {
        let bytecode = self.artifacts.bytecode(contract)?;

        let mut data = bytecode.to_vec();
        data.extend_from_slice(args.encoded());

        let tx_hash = self.send_transaction(None, data.into()).await?;
        tracing::info!(contract, tx_hash = %tx_hash, confirmations, "Deployment transaction sent");

        let (receipt, observed) = self.wait(tx_hash, confirmations).await?;
        let address = receipt
            .contract_address
            .with_context(|| format!("Receipt of {} has no contract address", tx_hash))?;

        Ok(DeploymentRecord {
            contract: contract.to_string(),
            address,
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            confirmations: observed,
        })
    }
}

impl CoordinatorMock for RpcChain {
    async fn create_subscription(
        &self,
        coordinator: Address,
    ) -> Result<Option<SubscriptionCreated>> {
        let tx_hash = self
            .send_transaction(Some(coordinator), encode_create_subscription())
            .await
            .context("createSubscription failed")?;

        let (receipt, _) = self.wait(tx_hash, 1).await?;

        decode_subscription_created(&receipt.logs, coordinator)
    }

    async fn fund_subscription(
        &self,
        coordinator: Address,
        subscription_id: u64,
        amount: U256,
    ) -> Result<B256> {
        let data = encode_fund_subscription(subscription_id, amount)?;
        let tx_hash = self
            .send_transaction(Some(coordinator), data)
            .await
            .context("fundSubscription failed")?;

        let (receipt, _) = self.wait(tx_hash, 1).await?;

        Ok(receipt.transaction_hash)
    }
}
