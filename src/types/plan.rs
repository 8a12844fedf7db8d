//! Planned transactions of a rescue run

use std::fmt;

use alloy::primitives::{Address, Bytes, U256};
use serde::Serialize;

/// Role of a transaction inside the rescue bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    /// Funding account -> compromised account, covers the gas of the other two
    Fund,
    /// Compromised account migrates the position into an escrow NFT
    PrimaryCall,
    /// Compromised account moves the minted NFT to the safe wallet
    FollowUpTransfer,
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fund => "fund",
            Self::PrimaryCall => "migrate",
            Self::FollowUpTransfer => "transfer",
        };
        f.write_str(name)
    }
}

/// A fully resolved, not yet signed transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionIntent {
    pub kind: IntentKind,
    /// Account whose key signs this transaction
    pub from: Address,
    pub to: Address,
    /// ABI-encoded calldata (empty for the fund transfer)
    pub data: Bytes,
    /// Native value in wei
    pub value: U256,
    pub gas_limit: u64,
    /// Gas price in wei
    pub gas_price: u128,
    pub nonce: u64,
    pub chain_id: u64,
}

impl TransactionIntent {
    /// Maximum fee this transaction can burn (`gas_limit * gas_price`)
    pub fn max_fee(&self) -> U256 {
        U256::from(self.gas_limit) * U256::from(self.gas_price)
    }
}

/// Nonces read once at plan start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NonceSnapshot {
    pub compromised: u64,
    pub funding: u64,
}

/// The three intents of one run plus the derived funding amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RescuePlan {
    /// Token id the migration is expected to mint (from simulation)
    pub token_id: U256,
    pub gas_price: u128,
    /// Wei sent to the compromised account
    pub funding_amount: U256,
    pub fund: TransactionIntent,
    pub primary: TransactionIntent,
    pub follow_up: TransactionIntent,
}

impl RescuePlan {
    /// Intents in nonce-independent submission order
    pub fn intents(&self) -> [&TransactionIntent; 3] {
        [&self.fund, &self.primary, &self.follow_up]
    }

    pub fn intent(&self, kind: IntentKind) -> &TransactionIntent {
        match kind {
            IntentKind::Fund => &self.fund,
            IntentKind::PrimaryCall => &self.primary,
            IntentKind::FollowUpTransfer => &self.follow_up,
        }
    }

    /// Native currency the whole bundle consumes: every leg's max fee plus any buffer
    pub fn total_cost(&self) -> U256 {
        let buffer = self
            .funding_amount
            .saturating_sub(self.primary.max_fee() + self.follow_up.max_fee());
        self.intents()
            .iter()
            .fold(buffer, |total, intent| total + intent.max_fee())
    }

    /// What the funding account must hold: the transfer plus its own fee
    pub fn funding_requirement(&self) -> U256 {
        self.funding_amount + self.fund.max_fee()
    }
}
