//! veNFT rescue orchestrator
//!
//! Moves a staked position out of an account whose private key is known to
//! be compromised, racing the sweeper bots that watch it.
//!
//! # Flow
//!
//! - Simulate `migrateToVotingEscrow` to learn the NFT id it will mint
//! - Read fee data and both accounts' nonces in parallel
//! - Plan fund / migrate / transfer with a single competitive gas price
//! - Sign all three offline
//! - Broadcast sequentially (fund first, confirmed) or all at once
//!
//! # Example
//!
//! ```rust,ignore
//! use ve_rescue::{BroadcastPolicy, LocalAccount, RescueConfig, RescueOrchestrator, RpcChainClient};
//!
//! #[tokio::main]
//! async fn main() -> eyre::Result<()> {
//!     let config = RescueConfig::from_env()?;
//!     let chain = RpcChainClient::new(&config.rpc_url, config.confirmation)?;
//!     let compromised = LocalAccount::from_private_key("0x...")?;
//!     let funding = LocalAccount::from_private_key("0x...")?;
//!
//!     let rescue = RescueOrchestrator::new(chain, config, compromised, funding)?;
//!     let report = rescue.run(BroadcastPolicy::SequentialConfirm).await?;
//!     println!("{}", report.outcome);
//!
//!     Ok(())
//! }
//! ```

pub mod broadcast;
pub mod chain;
pub mod config;
pub mod constants;
pub mod contracts;
pub mod error;
pub mod fee;
pub mod orchestrator;
pub mod planner;
pub mod preflight;
pub mod signer;
pub mod simulator;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use broadcast::{BroadcastPolicy, BroadcastStrategy};
pub use chain::{ChainClient, ConfirmationReceipt, RpcChainClient};
pub use config::{ConfirmationPolicy, Credentials, GasLimits, MigrationParams, RescueConfig};
pub use error::{eyre, Context, Report, RescueError, Result};
pub use fee::{FeeData, FeePolicy};
pub use orchestrator::{PreparedRescue, RescueOrchestrator};
pub use planner::TransactionPlanner;
pub use preflight::{preflight, PreflightReport};
pub use signer::{sign_plan, LocalAccount, SignedBundle, SignedPayload};
pub use simulator::simulate_migration;
pub use types::{
    BroadcastState, IntentKind, LegReport, LegStatus, NonceSnapshot, Outcome, RescuePlan,
    RescueReport, TransactionIntent,
};
