//! Submission and confirmation of a signed rescue bundle
//!
//! Two orderings are supported:
//!
//! - `SequentialConfirm`: fund, wait for the fund transfer to be mined, then
//!   send migrate + transfer together. Slower by one block, but the
//!   compromised account is guaranteed to hold gas when its transactions
//!   are evaluated.
//! - `SimultaneousBundle`: send all three at once and let the mempool
//!   order them. Smallest window for a sweeper, no funding guarantee.
//!
//! Nothing is ever retried. A rejected or unmined leg is reported as such.

use alloy::primitives::TxHash;
use futures::future::join_all;
use serde::Serialize;

use crate::chain::{ChainClient, ConfirmationReceipt};
use crate::error::RescueError;
use crate::signer::SignedBundle;
use crate::types::{
    BroadcastState, IntentKind, LegReport, LegStatus, Outcome, RescuePlan, RescueReport,
};

const RESCUE_LEGS: [IntentKind; 2] = [IntentKind::PrimaryCall, IntentKind::FollowUpTransfer];
const ALL_LEGS: [IntentKind; 3] = [
    IntentKind::Fund,
    IntentKind::PrimaryCall,
    IntentKind::FollowUpTransfer,
];

/// Ordering policy for the three signed transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastPolicy {
    /// Wait for the fund transfer to confirm before sending the rescue pair
    #[default]
    #[value(name = "sequential")]
    SequentialConfirm,
    /// Send everything at once
    #[value(name = "simultaneous")]
    SimultaneousBundle,
}

/// Leg bookkeeping while the state machine runs
struct Legs {
    legs: Vec<LegReport>,
    states: Vec<BroadcastState>,
}

impl Legs {
    fn new(plan: &RescuePlan) -> Self {
        let legs = ALL_LEGS
            .iter()
            .map(|kind| LegReport {
                kind: *kind,
                nonce: plan.intent(*kind).nonce,
                hash: None,
                status: LegStatus::NotSubmitted,
            })
            .collect();

        Self {
            legs,
            states: vec![BroadcastState::Planned],
        }
    }

    fn leg_mut(&mut self, kind: IntentKind) -> &mut LegReport {
        // Every kind is inserted in `new`
        let index = ALL_LEGS.iter().position(|k| *k == kind).unwrap_or_default();
        &mut self.legs[index]
    }

    fn status(&self, kind: IntentKind) -> &LegStatus {
        let index = ALL_LEGS.iter().position(|k| *k == kind).unwrap_or_default();
        &self.legs[index].status
    }

    fn transition(&mut self, state: BroadcastState) {
        tracing::debug!("Broadcast state -> {:?}", state);
        self.states.push(state);
    }

    fn record_submission(&mut self, kind: IntentKind, result: Result<TxHash, RescueError>) {
        let leg = self.leg_mut(kind);
        match result {
            Ok(hash) => {
                tracing::info!("TX {} sent: {} (nonce {})", kind, hash, leg.nonce);
                leg.hash = Some(hash);
                leg.status = LegStatus::Pending;
            }
            Err(err) => {
                tracing::error!("TX {} rejected (nonce {}): {}", kind, leg.nonce, err);
                leg.status = LegStatus::Rejected {
                    reason: err.to_string(),
                };
            }
        }
    }

    fn record_confirmation(
        &mut self,
        kind: IntentKind,
        result: Result<ConfirmationReceipt, RescueError>,
    ) {
        let leg = self.leg_mut(kind);
        match result {
            Ok(receipt) if receipt.success => {
                tracing::info!("TX {} confirmed in block {}", kind, receipt.block_number);
                leg.status = LegStatus::Confirmed {
                    block: receipt.block_number,
                };
            }
            Ok(receipt) => {
                tracing::error!("TX {} reverted in block {}", kind, receipt.block_number);
                leg.status = LegStatus::Reverted {
                    block: receipt.block_number,
                };
            }
            // Mined status unknown, the transaction may still land later
            Err(RescueError::ConfirmationTimeout { attempts, .. }) => {
                tracing::warn!(
                    "TX {} not confirmed after {} polls, still pending",
                    kind,
                    attempts
                );
                leg.status = LegStatus::Pending;
            }
            Err(err) => {
                tracing::warn!("TX {} receipt lookup failed, status unknown: {}", kind, err);
                leg.status = LegStatus::Pending;
            }
        }
    }

    /// Accepted legs among `kinds` that still await a receipt
    fn awaiting_receipt(&self, kinds: &[IntentKind]) -> Vec<(IntentKind, TxHash)> {
        self.legs
            .iter()
            .filter(|leg| kinds.contains(&leg.kind) && leg.status == LegStatus::Pending)
            .filter_map(|leg| leg.hash.map(|hash| (leg.kind, hash)))
            .collect()
    }

    fn finish(mut self, policy: BroadcastPolicy) -> RescueReport {
        let outcome = RescueReport::outcome_of(&self.legs);
        match outcome {
            Outcome::Settled => self.transition(BroadcastState::Settled),
            Outcome::Failed => self.transition(BroadcastState::Failed),
            Outcome::Pending => {}
        }

        RescueReport {
            policy,
            states: self.states,
            legs: self.legs,
            outcome,
        }
    }
}

/// Drives a signed bundle through the chosen policy
pub struct BroadcastStrategy<'a, C> {
    chain: &'a C,
    policy: BroadcastPolicy,
    min_confirmations: u64,
}

impl<'a, C: ChainClient> BroadcastStrategy<'a, C> {
    pub fn new(chain: &'a C, policy: BroadcastPolicy, min_confirmations: u64) -> Self {
        Self {
            chain,
            policy,
            min_confirmations: min_confirmations.max(1),
        }
    }

    /// Submit and confirm the bundle; the report is produced even when legs fail
    pub async fn execute(&self, plan: &RescuePlan, bundle: &SignedBundle) -> RescueReport {
        let mut legs = Legs::new(plan);

        match self.policy {
            BroadcastPolicy::SequentialConfirm => self.sequential(bundle, &mut legs).await,
            BroadcastPolicy::SimultaneousBundle => self.simultaneous(bundle, &mut legs).await,
        }

        let report = legs.finish(self.policy);
        tracing::info!("Broadcast finished: {}", report.outcome);
        report
    }

    async fn sequential(&self, bundle: &SignedBundle, legs: &mut Legs) {
        tracing::info!("Sending fund transfer...");
        self.submit(bundle, &[IntentKind::Fund], legs).await;
        if legs.status(IntentKind::Fund).is_failure() {
            return;
        }
        legs.transition(BroadcastState::FundSubmitted);

        tracing::info!("Waiting for fund confirmation...");
        self.confirm(&[IntentKind::Fund], legs).await;
        if !legs.status(IntentKind::Fund).is_confirmed() {
            tracing::warn!("Fund transfer not confirmed; migrate and transfer are not sent");
            return;
        }
        legs.transition(BroadcastState::FundConfirmed);

        tracing::info!("Sending migrate + transfer...");
        self.submit(bundle, &RESCUE_LEGS, legs).await;
        legs.transition(BroadcastState::RescueSubmitted);

        tracing::info!("Waiting for confirmations...");
        self.confirm(&RESCUE_LEGS, legs).await;
    }

    async fn simultaneous(&self, bundle: &SignedBundle, legs: &mut Legs) {
        tracing::info!("Sending fund + migrate + transfer together...");
        self.submit(bundle, &ALL_LEGS, legs).await;
        legs.transition(BroadcastState::AllSubmitted);

        tracing::info!("Waiting for confirmations...");
        self.confirm(&ALL_LEGS, legs).await;
    }

    /// Broadcast `kinds` concurrently
    async fn submit(&self, bundle: &SignedBundle, kinds: &[IntentKind], legs: &mut Legs) {
        let sends = kinds.iter().map(|kind| {
            let payload = bundle.get(*kind);
            async move { (payload.kind, self.chain.broadcast(payload).await) }
        });

        for (kind, result) in join_all(sends).await {
            legs.record_submission(kind, result);
        }
    }

    /// Wait for every accepted leg among `kinds` concurrently
    async fn confirm(&self, kinds: &[IntentKind], legs: &mut Legs) {
        let waits = legs.awaiting_receipt(kinds).into_iter().map(|(kind, hash)| async move {
            (
                kind,
                self.chain.await_confirmation(hash, self.min_confirmations).await,
            )
        });

        for (kind, result) in join_all(waits).await {
            legs.record_confirmation(kind, result);
        }
    }
}
