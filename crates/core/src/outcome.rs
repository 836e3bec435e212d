use chrono::{DateTime, Utc};

use crate::recipient::Recipient;

/// Terminal status of one send attempt.
///
/// Failures are explicit values, not propagated errors: a failed send is a
/// recorded fact the dispatcher acts on, never something that unwinds the
/// run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendStatus {
    Sent,
    Failed {
        /// Human-readable reason, taken from the underlying send error.
        reason: String,
    },
}

/// The recorded result of one send attempt.
///
/// Exactly one outcome is produced per non-empty recipient, in list order.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub recipient: Recipient,
    /// Position in the overall send sequence, starting at 1.
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub status: SendStatus,
}

impl SendOutcome {
    pub fn sent(recipient: Recipient, sequence: u64) -> Self {
        Self {
            recipient,
            sequence,
            timestamp: Utc::now(),
            status: SendStatus::Sent,
        }
    }

    pub fn failed(recipient: Recipient, sequence: u64, reason: impl Into<String>) -> Self {
        Self {
            recipient,
            sequence,
            timestamp: Utc::now(),
            status: SendStatus::Failed {
                reason: reason.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == SendStatus::Sent
    }
}
