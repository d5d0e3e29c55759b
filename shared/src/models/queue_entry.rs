//! Queue entry wire snapshot

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entry lifecycle status
///
/// Transitions are one-directional:
/// waiting → called → {seated, skipped}; waiting|called → cancelled.
/// Seated, cancelled and skipped are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Waiting,
    Called,
    Seated,
    Cancelled,
    Skipped,
}

impl EntryStatus {
    /// Terminal states never re-enter the queue
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Seated | Self::Cancelled | Self::Skipped)
    }

    /// Counted in the active (position-bearing) set
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Waiting | Self::Called)
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Called => write!(f, "called"),
            Self::Seated => write!(f, "seated"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// Estimated wait window in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitTimeRange {
    pub min: u32,
    pub max: u32,
}

/// One party's claim on a queue slot, as seen by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntrySnapshot {
    pub id: String,
    pub restaurant_id: String,
    pub customer_name: String,
    pub party_size: u32,
    /// 1-based dense rank among active entries
    pub position: u32,
    /// Expected wait in minutes, derived from position
    pub estimated_wait_time: u32,
    pub wait_time_range: WaitTimeRange,
    pub status: EntryStatus,
    pub is_walk_in: bool,
    /// Unix millis
    pub joined_at: i64,
    /// Unix millis, set when the party is called/notified
    pub notified_at: Option<i64>,
    pub ready_to_return: bool,
    /// Absolute grace window deadline, Unix millis
    pub grace_period_expiry: Option<i64>,
    /// Display hint: position has entered the near-front threshold
    pub near_front: bool,
}
