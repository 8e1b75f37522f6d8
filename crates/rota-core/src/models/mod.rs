//! Data models for schedules, exceptions and slots.
//!
//! Display implementations for these models live in
//! [`crate::display::models`], keeping the data structures free of
//! presentation logic.
//!
//! # Time model
//!
//! All times are civil wall-clock values with minute resolution
//! ([`jiff::civil::Time`]); dates are [`jiff::civil::Date`]. A
//! [`TimeInterval`] is half-open, so `09:00-10:00` and `10:00-11:00` touch
//! without overlapping.
//!
//! # Examples
//!
//! ```rust
//! use jiff::civil::date;
//! use rota_core::models::{DayRule, TimeInterval, WeekdayKey, WeeklyPattern};
//!
//! let morning = TimeInterval::parse("09:00-12:00").unwrap();
//! let afternoon = TimeInterval::parse("14:00-17:00").unwrap();
//! let pattern = WeeklyPattern::new(vec![DayRule::new(
//!     WeekdayKey::Monday,
//!     vec![morning, afternoon],
//! )])
//! .unwrap();
//!
//! // 2024-01-01 is a Monday
//! let day = WeekdayKey::of(date(2024, 1, 1));
//! assert_eq!(pattern.intervals_for(day).len(), 2);
//! assert!(pattern.intervals_for(WeekdayKey::Tuesday).is_empty());
//! ```

pub mod exception;
pub mod filters;
pub mod pattern;
pub mod schedule;
pub mod slot;
pub mod time;


pub use exception::Exception;
pub use filters::{ScheduleFilter, SlotFilter};
pub use pattern::{validate_intervals, DayRule, WeeklyPattern};
pub use schedule::{Schedule, ScheduleUpsert};
pub use slot::{Reconciliation, Slot, SlotCandidate};
pub use time::{minute_of_day, parse_date, parse_time, TimeInterval, WeekdayKey};
