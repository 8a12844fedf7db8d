//! Staking vault bindings (position -> voting-escrow migration)

use alloy::primitives::Bytes;
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::config::MigrationParams;

sol! {
    /// Vault that can migrate staked pool positions into a voting-escrow lock
    #[sol(rpc)]
    interface IEscrowVault {
        /// Migrate the caller's positions in `_pids` into a new voting-escrow NFT.
        /// Returns the id of the minted token.
        function migrateToVotingEscrow(
            uint16[] calldata _pids,
            uint256 _lockDuration,
            uint8 _lockType
        ) external returns (uint256);
    }
}

/// Calldata for `migrateToVotingEscrow` with the configured parameters
pub fn migration_calldata(params: &MigrationParams) -> Bytes {
    IEscrowVault::migrateToVotingEscrowCall {
        _pids: params.position_ids.clone(),
        _lockDuration: params.lock_duration,
        _lockType: params.lock_type,
    }
    .abi_encode()
    .into()
}
