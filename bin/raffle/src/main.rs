//! raffle is a CLI tool to deploy the Raffle contract on local and live networks.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use comfy_table::{Table, presets::UTF8_FULL};

use cli::{Cli, DeployArgs};
use raffle_deploy::{
    DeployConfig, EtherscanVerifier, NetworkRegistry, Orchestrator, SIMULATED_NETWORKS,
    VerificationStatus,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger.
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    let config = DeployConfig::load(cli.config.as_deref())?;

    match cli.into_deploy_args() {
        Some(args) => deploy(config, args).await,
        None => {
            let registry = config.registry()?;
            println!("{}", networks_table(&registry));
            Ok(())
        }
    }
}

fn apply_overrides(mut config: DeployConfig, args: &DeployArgs) -> DeployConfig {
    if let Some(network) = &args.network {
        config.network = network.clone();
    }
    if let Some(chain_id) = args.chain_id {
        config.chain_id = chain_id;
    }
    if let Some(rpc_url) = &args.rpc_url {
        config.rpc_url = rpc_url.clone();
    }
    if let Some(confirmations) = args.block_confirmations {
        config.block_confirmations = Some(confirmations);
    }
    if let Some(artifacts) = &args.artifacts {
        config.artifacts = artifacts.clone();
    }
    if args.from.is_some() {
        config.from = args.from;
    }
    if let Some(build_info) = &args.build_info {
        config.etherscan.build_info = Some(build_info.clone());
    }
    config
}

async fn deploy(config: DeployConfig, args: DeployArgs) -> Result<()> {
    let config = apply_overrides(config, &args);

    if let Some(path) = &args.save_config {
        config.save_to_file(path)?;
    }

    let registry = config.registry()?;
    let chain = config.rpc_chain()?;
    let target = config.target();

    let verifier = args
        .etherscan_api_key
        .filter(|key| !key.trim().is_empty())
        .map(|key| EtherscanVerifier::new(key, config.chain_id, config.etherscan.clone()))
        .transpose()?;

    tracing::info!(
        network = %target.name,
        chain_id = target.chain_id,
        rpc_url = %config.rpc_url,
        verification = verifier.is_some(),
        "Starting deployment..."
    );

    let outcome = Orchestrator::new(
        &registry,
        &SIMULATED_NETWORKS,
        &chain,
        &chain,
        verifier.as_ref(),
    )
    .run(&target)
    .await
    .context("Deployment failed")?;

    tracing::info!("✓ Deployment complete!");
    tracing::info!("");
    if let Some(mock) = &outcome.mock {
        tracing::info!("VRFCoordinatorV2Mock: {}", mock.address);
    }
    tracing::info!("VRF coordinator:      {}", outcome.subscription.coordinator());
    tracing::info!("Subscription ID:      {}", outcome.subscription.subscription_id());
    tracing::info!("Raffle:               {}", outcome.raffle.address);
    tracing::info!("Transaction:          {}", outcome.raffle.transaction_hash);
    tracing::info!("Constructor args:     {}", outcome.args);
    match &outcome.verification {
        VerificationStatus::Verified => tracing::info!("Verification:         verified"),
        VerificationStatus::Skipped(reason) => {
            tracing::info!("Verification:         skipped ({})", reason)
        }
        VerificationStatus::Failed(reason) => {
            tracing::warn!("Verification:         failed ({})", reason)
        }
    }

    Ok(())
}

fn networks_table(registry: &NetworkRegistry) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Chain ID",
        "Name",
        "Simulated",
        "VRF coordinator",
        "Subscription",
        "Entrance fee (wei)",
        "Interval (s)",
    ]);

    for (chain_id, profile) in registry.iter() {
        table.add_row(vec![
            chain_id.to_string(),
            profile.name.clone(),
            SIMULATED_NETWORKS.contains(&profile.name).to_string(),
            profile
                .vrf_coordinator
                .map(|a| a.to_string())
                .unwrap_or_else(|| "mock".to_string()),
            profile
                .subscription_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string()),
            profile.entrance_fee.to_string(),
            profile.interval.to_string(),
        ]);
    }

    table
}
