//! Run configuration for the rescue orchestrator
//!
//! Everything the planner needs is carried in one immutable
//! [`RescueConfig`] value so tests can point it at mock addresses.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::{Address, U256};

use crate::constants::{
    days_to_seconds, gwei_to_wei, DEFAULT_FOLLOW_UP_GAS_LIMIT, DEFAULT_LOCK_DAYS,
    DEFAULT_LOCK_TYPE, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_POSITION_ID, DEFAULT_PRIMARY_GAS_LIMIT, DEFAULT_VAULT, DEFAULT_VE_NFT,
    FUND_GAS_LIMIT, SECONDS_PER_DAY,
};
use crate::error::RescueError;
use crate::fee::FeePolicy;

/// Fixed arguments of `migrateToVotingEscrow`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationParams {
    /// Pool ids to migrate
    pub position_ids: Vec<u16>,
    /// Lock duration in seconds
    pub lock_duration: U256,
    /// Lock type understood by the vault
    pub lock_type: u8,
}

impl Default for MigrationParams {
    fn default() -> Self {
        Self {
            position_ids: vec![DEFAULT_POSITION_ID],
            lock_duration: U256::from(DEFAULT_LOCK_DAYS * SECONDS_PER_DAY),
            lock_type: DEFAULT_LOCK_TYPE,
        }
    }
}

/// Conservative fixed gas limits, one per transaction kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasLimits {
    pub primary: u64,
    pub follow_up: u64,
    pub fund: u64,
}

impl Default for GasLimits {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY_GAS_LIMIT,
            follow_up: DEFAULT_FOLLOW_UP_GAS_LIMIT,
            fund: FUND_GAS_LIMIT,
        }
    }
}

/// Receipt polling window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub min_confirmations: u64,
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            min_confirmations: 1,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

/// Full configuration of one rescue run
#[derive(Debug, Clone)]
pub struct RescueConfig {
    /// RPC endpoint URL
    pub rpc_url: String,
    /// Vault holding the position
    pub vault: Address,
    /// Voting-escrow NFT contract
    pub ve_nft: Address,
    /// Destination of the rescued NFT
    pub safe_wallet: Address,
    /// Arguments of the migration call
    pub migration: MigrationParams,
    /// Fixed gas limits
    pub gas_limits: GasLimits,
    /// Gas price derivation
    pub fee_policy: FeePolicy,
    /// Extra wei sent on top of the exact gas cover (zero by default)
    pub funding_buffer: U256,
    /// Confirmation polling
    pub confirmation: ConfirmationPolicy,
}

impl RescueConfig {
    /// Create a configuration with deployment defaults
    pub fn new(rpc_url: impl Into<String>, safe_wallet: Address) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            vault: DEFAULT_VAULT,
            ve_nft: DEFAULT_VE_NFT,
            safe_wallet,
            migration: MigrationParams::default(),
            gas_limits: GasLimits::default(),
            fee_policy: FeePolicy::default(),
            funding_buffer: U256::ZERO,
            confirmation: ConfirmationPolicy::default(),
        }
    }

    /// Load from the process environment (after `.env`)
    pub fn from_env() -> Result<Self, RescueError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RescueError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rpc_url = required(&lookup, "RPC_URL")?;
        let safe_wallet: Address = parse_required(&lookup, "SAFE_WALLET")?;

        let mut config = Self::new(rpc_url, safe_wallet);

        if let Some(vault) = parse_optional(&lookup, "VAULT_ADDRESS")? {
            config.vault = vault;
        }
        if let Some(ve_nft) = parse_optional(&lookup, "VE_NFT_ADDRESS")? {
            config.ve_nft = ve_nft;
        }
        if let Some(pid) = parse_optional::<u16, _>(&lookup, "POSITION_ID")? {
            config.migration.position_ids = vec![pid];
        }
        if let Some(days) = parse_optional(&lookup, "LOCK_DURATION_DAYS")? {
            config.migration.lock_duration = days_to_seconds(days).ok_or_else(|| {
                RescueError::Configuration(format!(
                    "invalid LOCK_DURATION_DAYS ({}): duration overflows",
                    days
                ))
            })?;
        }
        if let Some(lock_type) = parse_optional(&lookup, "LOCK_TYPE")? {
            config.migration.lock_type = lock_type;
        }
        if let Some(floor) = parse_optional(&lookup, "GAS_PRICE_FLOOR_GWEI")? {
            config.fee_policy.floor = gwei_to_wei(floor);
        }
        if let Some(margin) = parse_optional(&lookup, "GAS_MARGIN_PERCENT")? {
            config.fee_policy.margin_percent = margin;
        }
        if let Some(limit) = parse_optional(&lookup, "PRIMARY_GAS_LIMIT")? {
            config.gas_limits.primary = limit;
        }
        if let Some(limit) = parse_optional(&lookup, "FOLLOW_UP_GAS_LIMIT")? {
            config.gas_limits.follow_up = limit;
        }
        if let Some(buffer) = parse_optional(&lookup, "FUNDING_BUFFER_WEI")? {
            config.funding_buffer = buffer;
        }

        Ok(config)
    }

    /// Set the vault address
    pub fn with_vault(mut self, vault: Address) -> Self {
        self.vault = vault;
        self
    }

    /// Set the voting-escrow NFT address
    pub fn with_ve_nft(mut self, ve_nft: Address) -> Self {
        self.ve_nft = ve_nft;
        self
    }

    /// Set the fixed gas limits
    pub fn with_gas_limits(mut self, gas_limits: GasLimits) -> Self {
        self.gas_limits = gas_limits;
        self
    }

    /// Set the fee policy
    pub fn with_fee_policy(mut self, fee_policy: FeePolicy) -> Self {
        self.fee_policy = fee_policy;
        self
    }

    /// Set the funding safety buffer
    pub fn with_funding_buffer(mut self, buffer: U256) -> Self {
        self.funding_buffer = buffer;
        self
    }

    /// Set the confirmation polling window
    pub fn with_confirmation(mut self, confirmation: ConfirmationPolicy) -> Self {
        self.confirmation = confirmation;
        self
    }
}

/// Private keys of the two participating accounts
pub struct Credentials {
    pub compromised_key: String,
    pub funding_key: String,
}

impl Credentials {
    /// Load `COMPROMISED_PK` and `FUNDING_PK` from the process environment
    pub fn from_env() -> Result<Self, RescueError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, RescueError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            compromised_key: required(&lookup, "COMPROMISED_PK")?,
            funding_key: required(&lookup, "FUNDING_PK")?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("compromised_key", &"<redacted>")
            .field("funding_key", &"<redacted>")
            .finish()
    }
}

fn required<F>(lookup: &F, name: &str) -> Result<String, RescueError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(RescueError::Configuration(format!("missing {}", name))),
    }
}

fn parse_required<T, F>(lookup: &F, name: &str) -> Result<T, RescueError>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = required(lookup, name)?;
    raw.parse()
        .map_err(|e| RescueError::Configuration(format!("invalid {} ({}): {}", name, raw, e)))
}

fn parse_optional<T, F>(lookup: &F, name: &str) -> Result<Option<T>, RescueError>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => parse_required(lookup, name).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAFE: &str = "0x00000000000000000000000000000000000000aa";

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_from_minimal_env() {
        let config =
            RescueConfig::from_lookup(lookup(&[("RPC_URL", "http://node"), ("SAFE_WALLET", SAFE)]))
                .unwrap();

        assert_eq!(config.rpc_url, "http://node");
        assert_eq!(config.safe_wallet, SAFE.parse::<Address>().unwrap());
        assert_eq!(config.vault, DEFAULT_VAULT);
        assert_eq!(config.migration.position_ids, vec![3]);
        assert_eq!(config.gas_limits.primary, 700_000);
        assert_eq!(config.fee_policy.floor, 6_000_000_000);
        assert_eq!(config.funding_buffer, U256::ZERO);
    }

    #[test]
    fn test_overrides() {
        let config = RescueConfig::from_lookup(lookup(&[
            ("RPC_URL", "http://node"),
            ("SAFE_WALLET", SAFE),
            ("POSITION_ID", "7"),
            ("LOCK_DURATION_DAYS", "1"),
            ("GAS_PRICE_FLOOR_GWEI", "10"),
            ("GAS_MARGIN_PERCENT", "50"),
            ("PRIMARY_GAS_LIMIT", "800000"),
            ("FOLLOW_UP_GAS_LIMIT", "350000"),
            ("FUNDING_BUFFER_WEI", "1000"),
        ]))
        .unwrap();

        assert_eq!(config.migration.position_ids, vec![7]);
        assert_eq!(config.migration.lock_duration, U256::from(86_400u64));
        assert_eq!(config.fee_policy.floor, 10_000_000_000);
        assert_eq!(config.fee_policy.margin_percent, 50);
        assert_eq!(config.gas_limits.primary, 800_000);
        assert_eq!(config.gas_limits.follow_up, 350_000);
        assert_eq!(config.funding_buffer, U256::from(1000u64));
    }

    #[test]
    fn test_lock_duration_overflow_is_rejected() {
        let err = RescueConfig::from_lookup(lookup(&[
            ("RPC_URL", "http://node"),
            ("SAFE_WALLET", SAFE),
            ("LOCK_DURATION_DAYS", "300000000000000"),
        ]))
        .unwrap_err();
        assert!(
            matches!(err, RescueError::Configuration(msg) if msg.contains("LOCK_DURATION_DAYS"))
        );
    }

    #[test]
    fn test_missing_safe_wallet() {
        let err = RescueConfig::from_lookup(lookup(&[("RPC_URL", "http://node")])).unwrap_err();
        assert!(matches!(err, RescueError::Configuration(msg) if msg.contains("SAFE_WALLET")));
    }

    #[test]
    fn test_invalid_safe_wallet() {
        let err = RescueConfig::from_lookup(lookup(&[
            ("RPC_URL", "http://node"),
            ("SAFE_WALLET", "not-an-address"),
        ]))
        .unwrap_err();
        assert!(matches!(err, RescueError::Configuration(_)));
    }

    #[test]
    fn test_credentials_require_both_keys() {
        let err = Credentials::from_lookup(lookup(&[("COMPROMISED_PK", "0x01")])).unwrap_err();
        assert!(matches!(err, RescueError::Configuration(msg) if msg.contains("FUNDING_PK")));
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let creds = Credentials::from_lookup(lookup(&[
            ("COMPROMISED_PK", "0xdeadbeef"),
            ("FUNDING_PK", "0xcafebabe"),
        ]))
        .unwrap();
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("deadbeef"));
        assert!(!rendered.contains("cafebabe"));
    }
}
