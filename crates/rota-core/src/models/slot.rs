//! Slot model definition.

use jiff::{
    civil::{Date, Time},
    Timestamp,
};
use serde::{Deserialize, Serialize};

use super::TimeInterval;

/// A concrete, bookable, capacity-bounded time unit for one agent and date.
///
/// `(agent_id, date, start)` is unique across all slots and
/// `booked_count <= capacity` always holds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Slot {
    /// Unique identifier for the slot
    pub id: u64,

    /// Schedule that generated the slot; may no longer exist
    pub schedule_id: u64,

    /// Agent serving the slot
    pub agent_id: String,

    /// Service scope copied from the schedule at generation time
    pub org_service_id: Option<String>,

    pub date: Date,
    pub start: Time,
    pub end: Time,

    /// Maximum simultaneous bookings
    pub capacity: u32,

    /// Seats already taken
    pub booked_count: u32,

    /// Timestamp when the slot was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the slot was last modified (UTC)
    pub updated_at: Timestamp,
}

impl Slot {
    pub fn interval(&self) -> TimeInterval {
        TimeInterval {
            start: self.start,
            end: self.end,
        }
    }

    /// Seats still free.
    pub fn remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.booked_count)
    }

    pub fn is_open(&self) -> bool {
        self.remaining() > 0
    }
}

/// Candidate slot produced by the generator, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCandidate {
    pub schedule_id: u64,
    pub agent_id: String,
    pub org_service_id: Option<String>,
    pub date: Date,
    pub interval: TimeInterval,
    pub capacity: u32,
}

/// Outcome of reconciling one candidate against the slot store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// No slot existed at the key; a new one was inserted
    Created,
    /// A slot existed with lower capacity; its capacity was raised
    Upgraded { previous_capacity: u32 },
    /// A slot existed and was left as is
    Unchanged,
}
