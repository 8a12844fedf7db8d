//! RescueOrchestrator - main entry point for a rescue run
//!
//! Pipeline: simulate -> (fee, nonces, chain id, balance) in parallel ->
//! plan -> funding check -> offline signing -> broadcast.

use alloy::primitives::U256;

use crate::broadcast::{BroadcastPolicy, BroadcastStrategy};
use crate::chain::ChainClient;
use crate::config::RescueConfig;
use crate::constants::{format_gwei, format_native};
use crate::error::RescueError;
use crate::planner::TransactionPlanner;
use crate::signer::{sign_plan, LocalAccount, SignedBundle};
use crate::simulator::simulate_migration;
use crate::types::{NonceSnapshot, RescuePlan, RescueReport};

/// A plan with its signed payloads, nothing sent yet
#[derive(Debug, Clone)]
pub struct PreparedRescue {
    pub plan: RescuePlan,
    pub bundle: SignedBundle,
    /// Funding account balance observed at plan time
    pub funding_balance: U256,
}

/// Owns the two accounts and drives one rescue run against a chain client
pub struct RescueOrchestrator<C: ChainClient> {
    chain: C,
    config: RescueConfig,
    compromised: LocalAccount,
    funding: LocalAccount,
}

impl<C: ChainClient> RescueOrchestrator<C> {
    /// Create an orchestrator; rejects account setups that would make the rescue pointless
    pub fn new(
        chain: C,
        config: RescueConfig,
        compromised: LocalAccount,
        funding: LocalAccount,
    ) -> Result<Self, RescueError> {
        if config.safe_wallet == compromised.address() {
            return Err(RescueError::Configuration(
                "safe wallet must differ from the compromised account".to_string(),
            ));
        }
        if funding.address() == compromised.address() {
            return Err(RescueError::Configuration(
                "funding account must differ from the compromised account".to_string(),
            ));
        }

        tracing::info!("Compromised wallet: {}", compromised.address());
        tracing::info!("Funding wallet: {}", funding.address());
        tracing::info!("Safe wallet: {}", config.safe_wallet);

        Ok(Self {
            chain,
            config,
            compromised,
            funding,
        })
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }

    pub fn config(&self) -> &RescueConfig {
        &self.config
    }

    /// Simulate, plan and sign without broadcasting anything
    pub async fn prepare(&self) -> Result<PreparedRescue, RescueError> {
        let compromised = self.compromised.address();
        let funding = self.funding.address();

        // 1. Simulation (does not write on chain)
        let token_id = simulate_migration(
            &self.chain,
            compromised,
            self.config.vault,
            &self.config.migration,
        )
        .await?;
        tracing::info!("Expected veNFT id: {}", token_id);

        // 2. Independent reads, issued together
        let (fee_data, compromised_nonce, funding_nonce, chain_id, funding_balance) = tokio::join!(
            self.chain.fee_data(),
            self.chain.nonce(compromised),
            self.chain.nonce(funding),
            self.chain.chain_id(),
            self.chain.balance(funding),
        );
        let nonces = NonceSnapshot {
            compromised: compromised_nonce?,
            funding: funding_nonce?,
        };
        let chain_id = chain_id?;
        let funding_balance = funding_balance?;
        let fee_data = fee_data?;

        let gas_price = self.config.fee_policy.gas_price(&fee_data);
        tracing::info!(
            "Gas price: {} gwei (network {} gwei)",
            format_gwei(gas_price),
            format_gwei(fee_data.gas_price)
        );

        // 3. Plan
        let plan = TransactionPlanner::new(&self.config, compromised, funding)
            .plan(token_id, gas_price, nonces, chain_id);
        tracing::info!(
            "Funding amount: {} ({} wei), nonces compromised={} funding={}",
            format_native(plan.funding_amount),
            plan.funding_amount,
            nonces.compromised,
            nonces.funding
        );

        // 4. Funding check before anything is signed
        let required = plan.funding_requirement();
        if funding_balance < required {
            return Err(RescueError::InsufficientFundingBalance {
                account: funding,
                available: funding_balance,
                required,
            });
        }

        // 5. Offline signing
        let bundle = sign_plan(&plan, &self.compromised, &self.funding)?;

        Ok(PreparedRescue {
            plan,
            bundle,
            funding_balance,
        })
    }

    /// Full run: prepare, then broadcast under `policy`
    pub async fn run(&self, policy: BroadcastPolicy) -> Result<RescueReport, RescueError> {
        let prepared = self.prepare().await?;

        tracing::info!("Broadcasting with {:?} policy", policy);
        let report = BroadcastStrategy::new(
            &self.chain,
            policy,
            self.config.confirmation.min_confirmations,
        )
        .execute(&prepared.plan, &prepared.bundle)
        .await;

        if report.is_success() {
            tracing::info!("Rescue completed successfully");
        } else {
            for leg in &report.legs {
                tracing::warn!(
                    "Leg {} nonce={} hash={:?} status={:?}",
                    leg.kind,
                    leg.nonce,
                    leg.hash,
                    leg.status
                );
            }
        }

        Ok(report)
    }
}
