//! Configuration and connectivity check before a rescue run

use alloy::primitives::{Address, U256};
use serde::Serialize;

use crate::chain::ChainClient;
use crate::config::RescueConfig;
use crate::constants::format_native;
use crate::error::RescueError;
use crate::signer::LocalAccount;

/// What the node reports about the participating accounts
#[derive(Debug, Clone, Serialize)]
pub struct PreflightReport {
    pub chain_id: u64,
    pub block_number: u64,
    pub compromised: Address,
    pub funding: Address,
    pub safe_wallet: Address,
    pub compromised_balance: U256,
    pub funding_balance: U256,
}

impl PreflightReport {
    /// A rescue cannot start without gas money
    pub fn funding_ready(&self) -> bool {
        !self.funding_balance.is_zero()
    }
}

/// Connect, read chain identity and both balances
pub async fn preflight<C: ChainClient>(
    chain: &C,
    config: &RescueConfig,
    compromised: &LocalAccount,
    funding: &LocalAccount,
) -> Result<PreflightReport, RescueError> {
    let (chain_id, block_number) = tokio::join!(chain.chain_id(), chain.block_number());
    let chain_id = chain_id?;
    let block_number = block_number?;
    tracing::info!("RPC connection ok. Chain ID: {}, block: {}", chain_id, block_number);

    let (compromised_balance, funding_balance) = tokio::join!(
        chain.balance(compromised.address()),
        chain.balance(funding.address())
    );

    let report = PreflightReport {
        chain_id,
        block_number,
        compromised: compromised.address(),
        funding: funding.address(),
        safe_wallet: config.safe_wallet,
        compromised_balance: compromised_balance?,
        funding_balance: funding_balance?,
    };

    tracing::info!(
        "Compromised {}: {}",
        report.compromised,
        format_native(report.compromised_balance)
    );
    tracing::info!(
        "Funding {}: {}",
        report.funding,
        format_native(report.funding_balance)
    );
    tracing::info!("Safe (destination) {}", report.safe_wallet);

    if report.funding_ready() {
        tracing::info!("Funding wallet has funds");
    } else {
        tracing::warn!("Funding wallet holds 0; it needs funds to pay for gas");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{compromised_account, funding_account, Call, MockChain};

    #[tokio::test]
    async fn test_reports_balances() {
        let compromised = compromised_account();
        let funding = funding_account();
        let chain = MockChain::new()
            .with_balance(funding.address(), U256::from(5u64))
            .with_balance(compromised.address(), U256::from(1u64));
        let config = RescueConfig::new("http://localhost:8545", Address::repeat_byte(0x5a));

        let report = preflight(&chain, &config, &compromised, &funding).await.unwrap();

        assert_eq!(report.chain_id, 56);
        assert_eq!(report.block_number, 100);
        assert_eq!(report.funding_balance, U256::from(5u64));
        assert_eq!(report.compromised_balance, U256::from(1u64));
        assert!(report.funding_ready());
        assert!(chain.broadcasts().is_empty());
        assert!(!chain
            .calls()
            .iter()
            .any(|call| matches!(call, Call::Simulate { .. })));
    }

    #[tokio::test]
    async fn test_empty_funding_wallet_is_flagged() {
        let chain = MockChain::new();
        let config = RescueConfig::new("http://localhost:8545", Address::repeat_byte(0x5a));

        let report = preflight(&chain, &config, &compromised_account(), &funding_account())
            .await
            .unwrap();

        assert!(!report.funding_ready());
    }
}
