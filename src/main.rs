//! Command-line entry point
//!
//! Run with: cargo run -- run --policy sequential
//!
//! Requires RPC_URL, COMPROMISED_PK, FUNDING_PK and SAFE_WALLET (a `.env`
//! file is loaded when present).

use clap::{Parser, Subcommand};
use eyre::{Context, Result};
use tracing_subscriber::EnvFilter;

use ve_rescue::constants::format_native;
use ve_rescue::{
    preflight, BroadcastPolicy, Credentials, LocalAccount, RescueConfig, RescueOrchestrator,
    RpcChainClient,
};

#[derive(Debug, Parser)]
#[command(name = "ve-rescue", version, about = "Rescue a veNFT position from a compromised wallet")]
struct Cli {
    /// Print the final report as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify configuration, RPC connectivity and balances
    Check,
    /// Simulate, plan and sign without broadcasting
    Plan,
    /// Simulate, plan, sign and broadcast
    Run {
        /// Broadcast ordering
        #[arg(long, value_enum, default_value_t = BroadcastPolicy::SequentialConfirm, env = "RESCUE_POLICY")]
        policy: BroadcastPolicy,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = RescueConfig::from_env()?;
    let credentials = Credentials::from_env()?;
    let compromised = LocalAccount::from_private_key(&credentials.compromised_key)
        .context("Invalid COMPROMISED_PK (hex private key expected)")?;
    let funding = LocalAccount::from_private_key(&credentials.funding_key)
        .context("Invalid FUNDING_PK (hex private key expected)")?;
    drop(credentials);

    let chain = RpcChainClient::new(&config.rpc_url, config.confirmation)?;

    match cli.command {
        Command::Check => {
            let report = preflight(&chain, &config, &compromised, &funding)
                .await
                .context("Preflight check failed")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Command::Plan => {
            let rescue = RescueOrchestrator::new(chain, config, compromised, funding)?;
            let prepared = rescue.prepare().await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&prepared.plan)?);
            }
            println!(
                "Funding balance: {}, required: {}",
                format_native(prepared.funding_balance),
                format_native(prepared.plan.funding_requirement())
            );
            for payload in prepared.bundle.payloads() {
                println!("{} {} {}", payload.kind, payload.hash, payload.raw);
            }
        }
        Command::Run { policy } => {
            let rescue = RescueOrchestrator::new(chain, config, compromised, funding)?;
            let report = rescue.run(policy).await.context("Rescue aborted")?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            if !report.is_success() {
                eyre::bail!("Rescue finished {}; see leg statuses above", report.outcome);
            }
        }
    }

    Ok(())
}
