//! Offline signing for planned transactions
//!
//! Each intent is signed by the account that owns it; nothing here touches
//! the network. The three signatures are independent of each other.

mod local;

pub use local::LocalAccount;

use alloy::primitives::{Bytes, TxHash};

use crate::error::RescueError;
use crate::types::{IntentKind, RescuePlan};

/// A signed raw transaction ready for `eth_sendRawTransaction`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPayload {
    /// Which leg of the plan this is
    pub kind: IntentKind,
    /// Hash of the signed transaction
    pub hash: TxHash,
    /// EIP-2718 encoded bytes
    pub raw: Bytes,
}

/// All three signed legs of a plan
#[derive(Debug, Clone)]
pub struct SignedBundle {
    pub fund: SignedPayload,
    pub primary: SignedPayload,
    pub follow_up: SignedPayload,
}

impl SignedBundle {
    pub fn get(&self, kind: IntentKind) -> &SignedPayload {
        match kind {
            IntentKind::Fund => &self.fund,
            IntentKind::PrimaryCall => &self.primary,
            IntentKind::FollowUpTransfer => &self.follow_up,
        }
    }

    pub fn payloads(&self) -> [&SignedPayload; 3] {
        [&self.fund, &self.primary, &self.follow_up]
    }
}

/// Sign every intent of `plan` with its owning account
pub fn sign_plan(
    plan: &RescuePlan,
    compromised: &LocalAccount,
    funding: &LocalAccount,
) -> Result<SignedBundle, RescueError> {
    Ok(SignedBundle {
        fund: funding.sign(&plan.fund)?,
        primary: compromised.sign(&plan.primary)?,
        follow_up: compromised.sign(&plan.follow_up)?,
    })
}
