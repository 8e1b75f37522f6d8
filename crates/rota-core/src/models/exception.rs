//! Date-specific overrides of the weekly pattern.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{pattern::validate_intervals, TimeInterval};
use crate::error::Result;

/// One-off override for a single calendar date.
///
/// `available = false` closes the day. `available = true` with intervals
/// replaces the weekly hours, so an empty list also closes the day; without
/// intervals the weekly hours apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exception {
    pub date: Date,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intervals: Option<Vec<TimeInterval>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Exception {
    /// Day off.
    pub fn closed(date: Date, reason: Option<String>) -> Self {
        Self {
            date,
            available: false,
            intervals: None,
            reason,
        }
    }

    /// Working day with replacement hours.
    pub fn with_hours(date: Date, intervals: Vec<TimeInterval>, reason: Option<String>) -> Self {
        Self {
            date,
            available: true,
            intervals: Some(intervals),
            reason,
        }
    }

    /// Drops intervals on a closed day.
    ///
    /// An empty list on an open day is kept: it is not the same as no list.
    pub fn normalized(mut self) -> Self {
        if !self.available {
            self.intervals = None;
        }
        self
    }

    /// Replacement hours, if this exception carries a list. May be empty.
    pub fn replacement_hours(&self) -> Option<&[TimeInterval]> {
        if !self.available {
            return None;
        }
        self.intervals.as_deref()
    }

    /// Open day that relies on the weekly pattern for its hours.
    pub fn is_open_without_hours(&self) -> bool {
        self.available && self.replacement_hours().is_none()
    }

    /// Applies the same ordering/overlap rule as weekly day rules.
    pub fn validate(&self) -> Result<()> {
        match self.replacement_hours() {
            Some(intervals) => validate_intervals(&self.date.to_string(), intervals),
            None => Ok(()),
        }
    }
}
