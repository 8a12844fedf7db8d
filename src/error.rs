//! Error types for the rescue orchestrator
//!
//! `eyre` is used for ergonomic error handling with context at the edges
//! (binary, preflight). The run pipeline itself reports the typed
//! [`RescueError`] taxonomy so callers can tell an aborted run (nothing
//! spent) apart from a run that already touched the network.

pub use eyre::{eyre, Context, Report, Result};

use alloy::primitives::{Address, U256};

use crate::types::IntentKind;

/// Failure taxonomy of a rescue run
#[derive(Debug, thiserror::Error)]
pub enum RescueError {
    /// A required input is missing or malformed. Nothing was sent.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The primary call would revert against current chain state. Nothing was sent.
    #[error("simulation reverted: {reason}")]
    SimulationReverted { reason: String },

    /// The funding account cannot pay for the plan. Reported before signing.
    #[error("funding account {account} holds {available} wei but the plan needs {required} wei")]
    InsufficientFundingBalance {
        account: Address,
        available: U256,
        required: U256,
    },

    /// The node refused a raw transaction (bad nonce, underpriced, malformed).
    #[error("{kind} transaction rejected by node: {reason}")]
    BroadcastRejected { kind: IntentKind, reason: String },

    /// No receipt within the polling window. The transaction may still land.
    #[error("transaction {hash} not mined after {attempts} polls")]
    ConfirmationTimeout { hash: String, attempts: u32 },

    /// The intent could not be signed.
    #[error("failed to sign {kind} transaction: {reason}")]
    Signing { kind: IntentKind, reason: String },

    /// Transport or decoding fault talking to the RPC endpoint.
    #[error("rpc call {method} failed: {message}")]
    Rpc {
        method: &'static str,
        message: String,
    },
}

impl RescueError {
    /// Build an [`RescueError::Rpc`] from any displayable error
    pub fn rpc(method: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Rpc {
            method,
            message: err.to_string(),
        }
    }

    /// True when the failure happened before anything was broadcast
    pub fn is_pre_broadcast(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_)
                | Self::SimulationReverted { .. }
                | Self::InsufficientFundingBalance { .. }
                | Self::Signing { .. }
        )
    }
}
