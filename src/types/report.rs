//! Outcome of a broadcast run

use std::fmt;

use alloy::primitives::TxHash;
use serde::Serialize;

use super::plan::IntentKind;
use crate::broadcast::BroadcastPolicy;

/// States of the broadcast state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastState {
    Planned,
    FundSubmitted,
    FundConfirmed,
    RescueSubmitted,
    AllSubmitted,
    Settled,
    Failed,
}

/// Where a single transaction ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LegStatus {
    /// Never handed to the node
    NotSubmitted,
    /// Node refused the raw transaction
    Rejected { reason: String },
    /// Accepted but no receipt inside the polling window
    Pending,
    Confirmed { block: u64 },
    Reverted { block: u64 },
}

impl LegStatus {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::Reverted { .. })
    }
}

/// Per-transaction line of the final report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegReport {
    pub kind: IntentKind,
    pub nonce: u64,
    pub hash: Option<TxHash>,
    pub status: LegStatus,
}

/// Final verdict of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every leg confirmed successfully
    Settled,
    /// Nothing failed but at least one leg is still unmined
    Pending,
    /// At least one leg was rejected, reverted or never sent
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Settled => "settled",
            Self::Pending => "pending",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Bookkeeping of one broadcast run
#[derive(Debug, Clone, Serialize)]
pub struct RescueReport {
    pub policy: BroadcastPolicy,
    /// States visited, in order
    pub states: Vec<BroadcastState>,
    pub legs: Vec<LegReport>,
    pub outcome: Outcome,
}

impl RescueReport {
    pub fn leg(&self, kind: IntentKind) -> Option<&LegReport> {
        self.legs.iter().find(|leg| leg.kind == kind)
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Settled
    }

    /// Failed overall but some legs already landed on chain
    pub fn is_partially_settled(&self) -> bool {
        self.outcome != Outcome::Settled && self.legs.iter().any(|leg| leg.status.is_confirmed())
    }

    pub fn final_state(&self) -> BroadcastState {
        self.states.last().copied().unwrap_or(BroadcastState::Planned)
    }

    /// Derive the outcome from the leg statuses
    pub(crate) fn outcome_of(legs: &[LegReport]) -> Outcome {
        if legs
            .iter()
            .any(|leg| leg.status.is_failure() || leg.status == LegStatus::NotSubmitted)
        {
            Outcome::Failed
        } else if legs.iter().all(|leg| leg.status.is_confirmed()) {
            Outcome::Settled
        } else {
            Outcome::Pending
        }
    }
}
