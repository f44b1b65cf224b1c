//! Etherscan-compatible source verification.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use alloy_core::primitives::Address;
use anyhow::{Context, Result};
use backon::{ConstantBuilder, Retryable};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::{ConstructorArgs, SourceVerifier};

/// Default Etherscan API endpoint (multichain v2 API).
pub const DEFAULT_API_URL: &str = "https://api.etherscan.io/v2/api";
/// Default fully qualified name of the raffle contract.
pub const DEFAULT_CONTRACT_NAME: &str = "contracts/Raffle.sol:Raffle";

const STATUS_POLL_DELAY: Duration = Duration::from_secs(5);
const STATUS_POLL_ATTEMPTS: usize = 24;

/// Explorer settings shared by the config file and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtherscanConfig {
    /// API endpoint.
    pub api_url: Url,
    /// `path/to/File.sol:Contract` of the verified contract.
    pub contract_name: String,
    /// Hardhat build-info file holding the standard JSON input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_info: Option<PathBuf>,
}

impl Default for EtherscanConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default Etherscan URL is valid"),
            contract_name: DEFAULT_CONTRACT_NAME.to_string(),
            build_info: None,
        }
    }
}

/// Compiler input extracted from a Hardhat build-info file.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerInput {
    /// `v0.8.7+commit.e28d00a7` form, as the explorer expects.
    pub compiler_version: String,
    /// Solidity standard JSON input.
    pub standard_json: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildInfo {
    solc_long_version: String,
    input: Value,
}

impl CompilerInput {
    pub fn from_build_info(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read build info {}", path.display()))?;
        let info: BuildInfo = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse build info {}", path.display()))?;

        Ok(Self {
            compiler_version: format!("v{}", info.solc_long_version.trim_start_matches('v')),
            standard_json: info.input,
        })
    }
}

/// Response envelope of the explorer API.
#[derive(Debug, Clone, Deserialize)]
struct ApiResponse {
    status: String,
    #[serde(default)]
    message: String,
    result: String,
}

/// The explorer is still processing a submission.
#[derive(Debug, thiserror::Error)]
#[error("Verification pending")]
struct StillPending;

/// Verifies contracts through an Etherscan-compatible API.
pub struct EtherscanVerifier {
    client: reqwest::Client,
    api_key: String,
    chain_id: u64,
    config: EtherscanConfig,
    poll_delay: Duration,
}

impl EtherscanVerifier {
    pub fn new(api_key: impl Into<String>, chain_id: u64, config: EtherscanConfig) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .context("Failed to create HTTP client")?,
            api_key: api_key.into(),
            chain_id,
            config,
            poll_delay: STATUS_POLL_DELAY,
        })
    }

    async fn submit(&self, address: Address, args: &ConstructorArgs) -> Result<Option<String>> {
        let build_info = self
            .config
            .build_info
            .as_ref()
            .context("No build info configured for verification")?;
        let input = CompilerInput::from_build_info(build_info)?;
        let source_code = serde_json::to_string(&input.standard_json)
            .context("Failed to serialize standard JSON input")?;

        let chain_id = self.chain_id.to_string();
        let address = address.to_string();
        let constructor_args = args.encoded_hex();
        let form = [
            ("chainid", chain_id.as_str()),
            ("apikey", self.api_key.as_str()),
            ("module", "contract"),
            ("action", "verifysourcecode"),
            ("contractaddress", address.as_str()),
            ("sourceCode", source_code.as_str()),
            ("codeformat", "solidity-standard-json-input"),
            ("contractname", self.config.contract_name.as_str()),
            ("compilerversion", input.compiler_version.as_str()),
            ("constructorArguements", constructor_args.as_str()),
        ];

        let response: ApiResponse = self
            .client
            .post(self.config.api_url.clone())
            .form(&form)
            .send()
            .await
            .context("Failed to submit verification request")?
            .json()
            .await
            .context("Failed to parse verification response")?;

        interpret_submission(response)
    }

    async fn check_status(&self, guid: &str) -> Result<()> {
        let chain_id = self.chain_id.to_string();
        let response: ApiResponse = self
            .client
            .get(self.config.api_url.clone())
            .query(&[
                ("chainid", chain_id.as_str()),
                ("apikey", self.api_key.as_str()),
                ("module", "contract"),
                ("action", "checkverifystatus"),
                ("guid", guid),
            ])
            .send()
            .await
            .context("Failed to query verification status")?
            .json()
            .await
            .context("Failed to parse verification status")?;

        interpret_status(response)
    }
}

fn is_already_verified(result: &str) -> bool {
    result.to_lowercase().contains("already verified")
}

/// Returns the GUID to poll, or `None` when the contract is already verified.
fn interpret_submission(response: ApiResponse) -> Result<Option<String>> {
    if response.status == "1" {
        return Ok(Some(response.result));
    }
    if is_already_verified(&response.result) {
        return Ok(None);
    }
    anyhow::bail!("{}: {}", response.message, response.result)
}

fn interpret_status(response: ApiResponse) -> Result<()> {
    if response.status == "1" || is_already_verified(&response.result) {
        return Ok(());
    }
    if response.result.to_lowercase().contains("pending") {
        return Err(StillPending.into());
    }
    anyhow::bail!("{}", response.result)
}

impl SourceVerifier for EtherscanVerifier {
    async fn verify(&self, address: Address, args: &ConstructorArgs) -> Result<()> {
        let Some(guid) = self.submit(address, args).await? else {
            tracing::info!(address = %address, "Contract already verified");
            return Ok(());
        };

        tracing::debug!(guid = %guid, "Verification submitted, polling status...");

        (|| async { self.check_status(&guid).await })
            .retry(
                ConstantBuilder::default()
                    .with_delay(self.poll_delay)
                    .with_max_times(STATUS_POLL_ATTEMPTS),
            )
            .when(|e| e.is::<StillPending>())
            .notify(|_, after| {
                tracing::trace!(guid = %guid, ?after, "Verification pending, retrying...");
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn response(status: &str, result: &str) -> ApiResponse {
        ApiResponse {
            status: status.to_string(),
            message: if status == "1" { "OK" } else { "NOTOK" }.to_string(),
            result: result.to_string(),
        }
    }

    #[test]
    fn test_submission_returns_guid() {
        let guid = interpret_submission(response("1", "abc123")).unwrap();
        assert_eq!(guid.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_submission_already_verified() {
        let guid =
            interpret_submission(response("0", "Contract source code already verified")).unwrap();
        assert!(guid.is_none());
    }

    #[test]
    fn test_submission_error() {
        let err = interpret_submission(response("0", "Invalid API Key")).unwrap_err();
        assert!(err.to_string().contains("Invalid API Key"));
    }

    #[test]
    fn test_status_variants() {
        assert!(interpret_status(response("1", "Pass - Verified")).is_ok());
        assert!(interpret_status(response("0", "Already Verified")).is_ok());

        let pending = interpret_status(response("0", "Pending in queue")).unwrap_err();
        assert!(pending.is::<StillPending>());

        let failed = interpret_status(response("0", "Fail - Unable to verify")).unwrap_err();
        assert!(!failed.is::<StillPending>());
    }

    #[test]
    fn test_compiler_input_from_build_info() {
        let dir = TempDir::new("raffle-build-info").expect("Failed to create temp dir");
        let path = dir.path().join("build.json");
        std::fs::write(
            &path,
            r#"{"solcVersion":"0.8.7","solcLongVersion":"0.8.7+commit.e28d00a7","input":{"language":"Solidity","sources":{}}}"#,
        )
        .unwrap();

        let input = CompilerInput::from_build_info(&path).unwrap();
        assert_eq!(input.compiler_version, "v0.8.7+commit.e28d00a7");
        assert_eq!(input.standard_json["language"], "Solidity");
    }

    #[test]
    fn test_default_config() {
        let config = EtherscanConfig::default();
        assert_eq!(config.api_url.as_str(), DEFAULT_API_URL);
        assert_eq!(config.contract_name, DEFAULT_CONTRACT_NAME);
        assert!(config.build_info.is_none());
    }
}
