//! Builds the three transactions of a rescue run
//!
//! Gas limits are fixed per transaction kind instead of estimated, which
//! saves a round trip per call while racing the sweeper bots.

use alloy::primitives::{Address, Bytes, U256};

use crate::config::RescueConfig;
use crate::contracts::{migration_calldata, transfer_calldata};
use crate::types::{IntentKind, NonceSnapshot, RescuePlan, TransactionIntent};

/// Turns simulation output, fee and nonce snapshots into a [`RescuePlan`]
#[derive(Debug, Clone, Copy)]
pub struct TransactionPlanner<'a> {
    config: &'a RescueConfig,
    compromised: Address,
    funding: Address,
}

impl<'a> TransactionPlanner<'a> {
    pub fn new(config: &'a RescueConfig, compromised: Address, funding: Address) -> Self {
        Self {
            config,
            compromised,
            funding,
        }
    }

    /// Build the plan
    ///
    /// The compromised account receives exactly the gas it will burn
    /// (plus the configured buffer): anything left over would be swept.
    pub fn plan(
        &self,
        token_id: U256,
        gas_price: u128,
        nonces: NonceSnapshot,
        chain_id: u64,
    ) -> RescuePlan {
        let limits = self.config.gas_limits;

        let primary = TransactionIntent {
            kind: IntentKind::PrimaryCall,
            from: self.compromised,
            to: self.config.vault,
            data: migration_calldata(&self.config.migration),
            value: U256::ZERO,
            gas_limit: limits.primary,
            gas_price,
            nonce: nonces.compromised,
            chain_id,
        };

        let follow_up = TransactionIntent {
            kind: IntentKind::FollowUpTransfer,
            from: self.compromised,
            to: self.config.ve_nft,
            data: transfer_calldata(self.compromised, self.config.safe_wallet, token_id),
            value: U256::ZERO,
            gas_limit: limits.follow_up,
            gas_price,
            nonce: nonces.compromised + 1,
            chain_id,
        };

        let funding_amount = primary.max_fee() + follow_up.max_fee() + self.config.funding_buffer;

        let fund = TransactionIntent {
            kind: IntentKind::Fund,
            from: self.funding,
            to: self.compromised,
            data: Bytes::new(),
            value: funding_amount,
            gas_limit: limits.fund,
            gas_price,
            nonce: nonces.funding,
            chain_id,
        };

        RescuePlan {
            token_id,
            gas_price,
            funding_amount,
            fund,
            primary,
            follow_up,
        }
    }
}
