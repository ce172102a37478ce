//! Transaction lifecycle notifications
//!
//! One-way: the orchestrator never awaits or inspects delivery.

use alloy_primitives::TxHash;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// What the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    Approve,
    Stake,
    Harvest,
    Withdraw,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Approve => write!(f, "approve"),
            OperationKind::Stake => write!(f, "stake"),
            OperationKind::Harvest => write!(f, "harvest"),
            OperationKind::Withdraw => write!(f, "withdraw"),
        }
    }
}

/// Lifecycle of a submitted transaction. `Confirmed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    Pending,
    Confirmed,
    Failed,
}

impl TxStatus {
    pub fn from_receipt(success: bool) -> Self {
        if success {
            TxStatus::Confirmed
        } else {
            TxStatus::Failed
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TxStatus::Pending)
    }
}

impl std::fmt::Display for TxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxStatus::Pending => write!(f, "pending"),
            TxStatus::Confirmed => write!(f, "confirmed"),
            TxStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: OperationKind,
    pub stage: TxStatus,
    pub chain_id: u64,
    pub tx_hash: TxHash,
    /// Human-readable token amount, when the operation moves one
    pub amount: Option<String>,
}

pub trait NotificationSink {
    fn notify(&self, notification: Notification);
}

/// Default sink, writes lifecycle events to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, n: Notification) {
        let amount = n.amount.as_deref().unwrap_or("-");
        match n.stage {
            TxStatus::Failed => warn!(
                "❌ {} {} on chain {} (amount: {}, tx: {:?})",
                n.kind, n.stage, n.chain_id, amount, n.tx_hash
            ),
            _ => info!(
                "{} {} on chain {} (amount: {}, tx: {:?})",
                n.kind, n.stage, n.chain_id, amount, n.tx_hash
            ),
        }
    }
}
