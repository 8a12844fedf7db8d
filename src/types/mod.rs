//! Value types shared by the planner, signer and broadcast strategy

pub mod plan;
pub mod report;

pub use plan::{IntentKind, NonceSnapshot, RescuePlan, TransactionIntent};
pub use report::{BroadcastState, LegReport, LegStatus, Outcome, RescueReport};
