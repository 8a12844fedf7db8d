//! Dry execution of the migration call
//!
//! The simulated return value is the id of the escrow NFT the real call
//! would mint. A revert here aborts the run before anything is signed.

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;

use crate::chain::ChainClient;
use crate::config::MigrationParams;
use crate::contracts::{migration_calldata, IEscrowVault};
use crate::error::RescueError;

/// Simulate `migrateToVotingEscrow` as `caller` and return the token id it would mint
pub async fn simulate_migration<C: ChainClient>(
    chain: &C,
    caller: Address,
    vault: Address,
    params: &MigrationParams,
) -> Result<U256, RescueError> {
    let data = migration_calldata(params);

    let output = chain.simulate_call(caller, vault, data).await?;

    IEscrowVault::migrateToVotingEscrowCall::abi_decode_returns(&output)
        .map_err(|e| RescueError::rpc("eth_call", format!("undecodable migration result: {}", e)))
}
