//! Timestamp display for audit fields.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Displays a `Timestamp` as `YYYY-MM-DD HH:MM TZ`.
///
/// Uses the system time zone unless one is given with
/// [`LocalDateTime::in_zone`].
pub struct LocalDateTime<'a> {
    timestamp: &'a Timestamp,
    zone: Option<TimeZone>,
}

impl<'a> LocalDateTime<'a> {
    pub fn new(timestamp: &'a Timestamp) -> Self {
        Self {
            timestamp,
            zone: None,
        }
    }

    pub fn in_zone(timestamp: &'a Timestamp, zone: TimeZone) -> Self {
        Self {
            timestamp,
            zone: Some(zone),
        }
    }
}

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let zone = self.zone.clone().unwrap_or_else(TimeZone::system);
        write!(
            f,
            "{}",
            self.timestamp.to_zoned(zone).strftime("%Y-%m-%d %H:%M %Z")
        )
    }
}
