//! Chain access abstraction
//!
//! The orchestrator only talks to the network through [`ChainClient`], so a
//! run can be replayed against a scripted client in tests. [`RpcChainClient`]
//! is the JSON-RPC implementation backed by an alloy provider.

mod rpc;

pub use rpc::RpcChainClient;

use alloy::primitives::{Address, Bytes, TxHash, U256};

use crate::error::RescueError;
use crate::fee::FeeData;
use crate::signer::SignedPayload;

/// Receipt summary once a transaction is mined deep enough
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationReceipt {
    pub hash: TxHash,
    pub block_number: u64,
    /// False when the transaction was mined but reverted
    pub success: bool,
}

/// Trait for the JSON-RPC surface the rescue run needs
///
/// `broadcast` is the only method that mutates network state.
pub trait ChainClient: Send + Sync {
    /// `eth_chainId`
    fn chain_id(&self) -> impl std::future::Future<Output = Result<u64, RescueError>> + Send;

    /// `eth_blockNumber`
    fn block_number(&self) -> impl std::future::Future<Output = Result<u64, RescueError>> + Send;

    /// `eth_getTransactionCount` at the latest block
    fn nonce(
        &self,
        account: Address,
    ) -> impl std::future::Future<Output = Result<u64, RescueError>> + Send;

    /// `eth_gasPrice`
    fn fee_data(&self) -> impl std::future::Future<Output = Result<FeeData, RescueError>> + Send;

    /// `eth_getBalance` at the latest block
    fn balance(
        &self,
        account: Address,
    ) -> impl std::future::Future<Output = Result<U256, RescueError>> + Send;

    /// `eth_call`; fails with [`RescueError::SimulationReverted`] when the call would revert
    fn simulate_call(
        &self,
        from: Address,
        to: Address,
        data: Bytes,
    ) -> impl std::future::Future<Output = Result<Bytes, RescueError>> + Send;

    /// `eth_sendRawTransaction`; fails with [`RescueError::BroadcastRejected`] when refused
    fn broadcast(
        &self,
        payload: &SignedPayload,
    ) -> impl std::future::Future<Output = Result<TxHash, RescueError>> + Send;

    /// Poll `eth_getTransactionReceipt` until mined with `min_confirmations` depth;
    /// fails with [`RescueError::ConfirmationTimeout`] after the polling window
    fn await_confirmation(
        &self,
        hash: TxHash,
        min_confirmations: u64,
    ) -> impl std::future::Future<Output = Result<ConfirmationReceipt, RescueError>> + Send;
}
