//! Gas price derivation for a rescue run

use crate::constants::{gwei_to_wei, DEFAULT_COMPETITIVE_MARGIN_PERCENT, DEFAULT_GAS_PRICE_FLOOR_GWEI};

/// Raw fee data reported by the node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeData {
    /// `eth_gasPrice` in wei
    pub gas_price: u128,
}

/// Floor-then-margin gas price policy
///
/// `effective = max(network, floor) * (100 + margin_percent) / 100`, with
/// integer truncation. Computed once per run and shared by all three
/// transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeePolicy {
    /// Minimum gas price in wei
    pub floor: u128,
    /// Percentage bid on top of the floored price
    pub margin_percent: u32,
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self {
            floor: gwei_to_wei(DEFAULT_GAS_PRICE_FLOOR_GWEI),
            margin_percent: DEFAULT_COMPETITIVE_MARGIN_PERCENT,
        }
    }
}

impl FeePolicy {
    pub fn new(floor: u128, margin_percent: u32) -> Self {
        Self {
            floor,
            margin_percent,
        }
    }

    /// Effective gas price for this run
    pub fn gas_price(&self, fee_data: &FeeData) -> u128 {
        let base = fee_data.gas_price.max(self.floor);
        let factor = 100u128 + self.margin_percent as u128;
        base.saturating_mul(factor) / 100
    }
}
