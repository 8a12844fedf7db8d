//! Voting-escrow NFT bindings (ERC-721 subset)

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

sol! {
    /// ERC-721 surface needed to move the escrow token out
    #[sol(rpc)]
    interface IVotingEscrowNft {
        /// Transfers `tokenId` from `from` to `to` without receiver checks
        function transferFrom(address from, address to, uint256 tokenId) external;
    }
}

/// Calldata moving `token_id` from `from` to `to`
pub fn transfer_calldata(from: Address, to: Address, token_id: U256) -> Bytes {
    IVotingEscrowNft::transferFromCall {
        from,
        to,
        tokenId: token_id,
    }
    .abi_encode()
    .into()
}
