//! Calendar primitives: weekday keys, minute-resolution time intervals and
//! parsing of the `YYYY-MM-DD` / `HH:MM` wire formats.

use std::{fmt, str::FromStr};

use jiff::civil::{Date, Time, Weekday};
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// Minutes in a civil day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Weekday key used by weekly patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum WeekdayKey {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl WeekdayKey {
    /// All weekdays, Monday first.
    pub const ALL: [WeekdayKey; 7] = [
        WeekdayKey::Monday,
        WeekdayKey::Tuesday,
        WeekdayKey::Wednesday,
        WeekdayKey::Thursday,
        WeekdayKey::Friday,
        WeekdayKey::Saturday,
        WeekdayKey::Sunday,
    ];

    /// Lowercase English name, as stored and accepted on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            WeekdayKey::Monday => "monday",
            WeekdayKey::Tuesday => "tuesday",
            WeekdayKey::Wednesday => "wednesday",
            WeekdayKey::Thursday => "thursday",
            WeekdayKey::Friday => "friday",
            WeekdayKey::Saturday => "saturday",
            WeekdayKey::Sunday => "sunday",
        }
    }

    /// The weekday a calendar date falls on.
    pub fn of(date: Date) -> Self {
        date.weekday().into()
    }
}

impl From<Weekday> for WeekdayKey {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Monday => WeekdayKey::Monday,
            Weekday::Tuesday => WeekdayKey::Tuesday,
            Weekday::Wednesday => WeekdayKey::Wednesday,
            Weekday::Thursday => WeekdayKey::Thursday,
            Weekday::Friday => WeekdayKey::Friday,
            Weekday::Saturday => WeekdayKey::Saturday,
            Weekday::Sunday => WeekdayKey::Sunday,
        }
    }
}

impl FromStr for WeekdayKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monday" | "mon" => Ok(WeekdayKey::Monday),
            "tuesday" | "tue" => Ok(WeekdayKey::Tuesday),
            "wednesday" | "wed" => Ok(WeekdayKey::Wednesday),
            "thursday" | "thu" => Ok(WeekdayKey::Thursday),
            "friday" | "fri" => Ok(WeekdayKey::Friday),
            "saturday" | "sat" => Ok(WeekdayKey::Saturday),
            "sunday" | "sun" => Ok(WeekdayKey::Sunday),
            _ => Err(format!("Invalid weekday: {s}")),
        }
    }
}

impl fmt::Display for WeekdayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open time window `[start, end)` within one civil day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: Time,
    pub end: Time,
}

impl TimeInterval {
    /// Builds an interval, requiring whole minutes and `start < end`.
    pub fn new(start: Time, end: Time) -> Result<Self> {
        for (field, time) in [("start", start), ("end", end)] {
            if time.second() != 0 || time.subsec_nanosecond() != 0 {
                return Err(SchedulerError::invalid_parameter(field)
                    .with_reason(format!("{time} is not a whole minute")));
            }
        }
        if start >= end {
            return Err(SchedulerError::invalid_parameter("interval").with_reason(format!(
                "start {} must be before end {}",
                start.strftime("%H:%M"),
                end.strftime("%H:%M")
            )));
        }
        Ok(Self { start, end })
    }

    /// Builds an interval from minute offsets since midnight.
    pub fn from_minutes(start: u32, end: u32) -> Result<Self> {
        Self::new(time_from_minute(start)?, time_from_minute(end)?)
    }

    /// Parses the `HH:MM-HH:MM` form.
    pub fn parse(s: &str) -> Result<Self> {
        let (start, end) = s.split_once('-').ok_or_else(|| {
            SchedulerError::invalid_parameter("interval")
                .with_reason(format!("'{s}' is not in HH:MM-HH:MM form"))
        })?;
        Self::new(parse_time("start", start)?, parse_time("end", end)?)
    }

    pub fn start_minute(&self) -> u32 {
        minute_of_day(self.start)
    }

    pub fn end_minute(&self) -> u32 {
        minute_of_day(self.end)
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end_minute() - self.start_minute()
    }

    /// Whether the two half-open intervals share at least one minute.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.strftime("%H:%M"),
            self.end.strftime("%H:%M")
        )
    }
}

/// Minutes elapsed since midnight, ignoring seconds.
pub fn minute_of_day(time: Time) -> u32 {
    time.hour() as u32 * 60 + time.minute() as u32
}

/// Inverse of [`minute_of_day`]; the last representable minute is 23:59.
pub fn time_from_minute(minute: u32) -> Result<Time> {
    if minute >= MINUTES_PER_DAY {
        return Err(SchedulerError::invalid_parameter("time")
            .with_reason(format!("minute offset {minute} is past the end of the day")));
    }
    Time::new((minute / 60) as i8, (minute % 60) as i8, 0, 0).map_err(|e| {
        SchedulerError::invalid_parameter("time").with_reason(e.to_string())
    })
}

/// Parses an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(field: &str, value: &str) -> Result<Date> {
    value.trim().parse::<Date>().map_err(|e| {
        SchedulerError::invalid_parameter(field)
            .with_reason(format!("'{value}' is not a valid date: {e}"))
    })
}

/// Parses a wall-clock time (`HH:MM`); seconds must be zero when given.
pub fn parse_time(field: &str, value: &str) -> Result<Time> {
    let time = value.trim().parse::<Time>().map_err(|e| {
        SchedulerError::invalid_parameter(field)
            .with_reason(format!("'{value}' is not a valid time: {e}"))
    })?;
    if time.second() != 0 || time.subsec_nanosecond() != 0 {
        return Err(SchedulerError::invalid_parameter(field)
            .with_reason(format!("'{value}' is not a whole minute")));
    }
    Ok(time)
}
