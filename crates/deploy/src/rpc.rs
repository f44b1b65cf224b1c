//! Shared RPC utilities for interacting with Ethereum JSON-RPC endpoints.

use std::time::Duration;

use alloy_core::primitives::{Address, B256, Bytes};
use anyhow::Context;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

/// Default timeout for RPC requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Create an HTTP client configured for JSON-RPC requests.
pub fn create_client() -> Result<reqwest::Client, anyhow::Error> {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .context("Failed to create HTTP client")
}

/// Make a JSON-RPC call and deserialize the result.
///
/// # Arguments
/// * `client` - The HTTP client to use
/// * `url` - The RPC endpoint URL
/// * `method` - The RPC method name
/// * `params` - The method parameters
///
/// # Returns
/// The deserialized result, or an error if the request failed or returned an error response.
pub async fn json_rpc_call<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    method: &str,
    params: Vec<Value>,
) -> Result<T, anyhow::Error> {
    let response = client
        .post(url)
        .json(&serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        }))
        .send()
        .await
        .with_context(|| format!("Failed to send {} request", method))?;

    let result: Value = response
        .json()
        .await
        .with_context(|| format!("Failed to parse {} response", method))?;

    if let Some(error) = result.get("error") {
        anyhow::bail!(
            "RPC error: {}",
            error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown")
        );
    }

    let result_value = result
        .get("result")
        .context("No result in response")?
        .clone();

    serde_json::from_value(result_value)
        .with_context(|| format!("Failed to deserialize {} result", method))
}

/// Deserialize a u64 from a hex string (with 0x prefix).
pub fn deserialize_u64_from_hex<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    parse_hex_u64(&s).map_err(serde::de::Error::custom)
}

/// Parse a `0x`-prefixed quantity.
pub fn parse_hex_u64(s: &str) -> Result<u64, std::num::ParseIntError> {
    u64::from_str_radix(s.trim_start_matches("0x"), 16)
}

/// Log entry of a transaction receipt.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReceiptLog {
    pub address: Address,
    pub topics: Vec<B256>,
    #[serde(default)]
    pub data: Bytes,
}

/// The subset of `eth_getTransactionReceipt` used by the deployer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    #[serde(deserialize_with = "deserialize_u64_from_hex")]
    pub block_number: u64,
    #[serde(default)]
    pub contract_address: Option<Address>,
    /// `0x1` on success, `0x0` on revert.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub logs: Vec<ReceiptLog>,
}

impl TransactionReceipt {
    pub fn succeeded(&self) -> bool {
        self.status
            .as_deref()
            .map(|s| parse_hex_u64(s).map(|v| v == 1).unwrap_or(false))
            .unwrap_or(true)
    }

    /// Confirmations given the current chain head.
    pub fn confirmations(&self, head: u64) -> u64 {
        head.saturating_sub(self.block_number).saturating_add(1)
    }
}

/// Fetch the chain ID of the endpoint.
pub async fn chain_id(client: &reqwest::Client, url: &str) -> Result<u64, anyhow::Error> {
    let raw: String = json_rpc_call(client, url, "eth_chainId", vec![]).await?;
    parse_hex_u64(&raw).with_context(|| format!("Invalid chain ID: {}", raw))
}

/// Fetch the current block number.
pub async fn block_number(client: &reqwest::Client, url: &str) -> Result<u64, anyhow::Error> {
    let raw: String = json_rpc_call(client, url, "eth_blockNumber", vec![]).await?;
    parse_hex_u64(&raw).with_context(|| format!("Invalid block number: {}", raw))
}

/// Wait until `tx_hash` is mined and buried under `confirmations` blocks.
///
/// # Arguments
/// * `poll_interval` - Delay between polling attempts
/// * `timeout` - Maximum time to wait
///
/// # Returns
/// The receipt and the confirmation count observed, or an error on revert or timeout.
pub async fn wait_for_confirmations(
    client: &reqwest::Client,
    url: &str,
    tx_hash: B256,
    confirmations: u64,
    poll_interval: Duration,
    timeout: Duration,
) -> Result<(TransactionReceipt, u64), anyhow::Error> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            anyhow::bail!(
                "Timeout waiting for {} confirmation(s) of {}",
                confirmations,
                tx_hash
            );
        }

        let receipt: Option<TransactionReceipt> = json_rpc_call(
            client,
            url,
            "eth_getTransactionReceipt",
            vec![serde_json::json!(tx_hash)],
        )
        .await?;

        match receipt {
            Some(receipt) if !receipt.succeeded() => {
                anyhow::bail!("Transaction {} reverted", tx_hash);
            }
            Some(receipt) => {
                let head = block_number(client, url).await?;
                let observed = receipt.confirmations(head);
                if observed >= confirmations.max(1) {
                    return Ok((receipt, observed));
                }
                tracing::trace!(
                    tx_hash = %tx_hash,
                    observed,
                    confirmations,
                    "Waiting for confirmations..."
                );
            }
            None => {
                tracing::trace!(tx_hash = %tx_hash, "Transaction pending...");
            }
        }

        tokio::time::sleep(poll_interval).await;
    }
}
