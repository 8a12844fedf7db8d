//! Deployment defaults and unit helpers

use alloy::primitives::{address, Address, U256};

/// Vault holding the staked position (`migrateToVotingEscrow`)
pub const DEFAULT_VAULT: Address = address!("cfb6b8b220e877c7d9803bf53da08d78c7f7a535");

/// Voting-escrow NFT minted by the migration
pub const DEFAULT_VE_NFT: Address = address!("df1dd618f3b564765e3ffc9f229637942ef601b2");

/// Pool id of the position to migrate
pub const DEFAULT_POSITION_ID: u16 = 3;

/// Lock duration in days (210 days)
pub const DEFAULT_LOCK_DAYS: u64 = 210;

/// Lock type passed to the vault (0 = standard lock)
pub const DEFAULT_LOCK_TYPE: u8 = 0;

/// Gas limit for `migrateToVotingEscrow`
pub const DEFAULT_PRIMARY_GAS_LIMIT: u64 = 700_000;

/// Gas limit for the NFT `transferFrom`
pub const DEFAULT_FOLLOW_UP_GAS_LIMIT: u64 = 300_000;

/// Plain native transfer
pub const FUND_GAS_LIMIT: u64 = 21_000;

/// Gas price floor (6 gwei)
pub const DEFAULT_GAS_PRICE_FLOOR_GWEI: u64 = 6;

/// Percentage added on top of the floored network price
pub const DEFAULT_COMPETITIVE_MARGIN_PERCENT: u32 = 20;

/// Receipt polling: 60 attempts * 2 seconds = 2 minutes
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 60;

pub const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

const WEI_PER_GWEI: u128 = 1_000_000_000;
const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Convert whole gwei to wei
pub fn gwei_to_wei(gwei: u64) -> u128 {
    gwei as u128 * WEI_PER_GWEI
}

/// Lock duration in seconds for a number of days, `None` when it overflows u64 seconds
pub fn days_to_seconds(days: u64) -> Option<U256> {
    days.checked_mul(SECONDS_PER_DAY).map(U256::from)
}

/// Format a wei amount as a decimal native-currency string (18 decimals)
pub fn format_native(wei: U256) -> String {
    let unit = U256::from(WEI_PER_ETHER);
    let whole = wei / unit;
    let frac = (wei % unit).to::<u128>();
    let frac = format!("{:018}", frac);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, frac)
    }
}

/// Format a wei gas price in gwei with up to 9 decimals
pub fn format_gwei(wei: u128) -> String {
    let whole = wei / WEI_PER_GWEI;
    let frac = wei % WEI_PER_GWEI;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:09}", frac);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}
