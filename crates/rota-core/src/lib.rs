//! Core library for Rota, an agent availability and slot-generation engine.
//!
//! An organization describes when each agent works with a recurring
//! [`WeeklyPattern`](models::WeeklyPattern) plus date-specific
//! [`Exception`](models::Exception)s. The [`engine`] expands that description
//! over a date range into concrete, capacity-bounded [`Slot`](models::Slot)s,
//! idempotently and without touching seats that are already booked.
//!
//! # Layers
//!
//! - [`models`] and [`params`]: domain types and the wire-level parameter
//!   structs shared by every interface
//! - [`engine`]: the pure partition and resolve steps, and the generator that
//!   drives them against a [`SlotStore`](engine::SlotStore)
//! - [`db`]: SQLite persistence, including the atomic per-slot reconcile
//! - [`scheduler`]: the async facade used by the CLI and the MCP server
//! - [`display`]: markdown formatting for terminal and MCP output
//! - [`config`]: TOML configuration
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rota_core::{
//!     models::WeekdayKey,
//!     params::{AddException, DaySchedule, GenerateSlots, TimeRange, UpsertSchedule},
//!     SchedulerBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let scheduler = SchedulerBuilder::new()
//!     .with_database_path(Some("rota.db"))
//!     .build()
//!     .await?;
//!
//! let schedule = scheduler
//!     .upsert_schedule(&UpsertSchedule {
//!         org_id: "org-1".to_string(),
//!         agent_id: "agent-a".to_string(),
//!         org_service_id: None,
//!         weekly_pattern: vec![DaySchedule {
//!             day: WeekdayKey::Wednesday,
//!             time_ranges: vec![TimeRange::new("09:00", "12:00")],
//!         }],
//!     })
//!     .await?
//!     .schedule;
//!
//! scheduler
//!     .add_exception(&AddException {
//!         schedule_id: schedule.id,
//!         date: "2024-01-03".to_string(),
//!         available: false,
//!         time_ranges: None,
//!         reason: Some("holiday".to_string()),
//!     })
//!     .await?;
//!
//! let report = scheduler
//!     .generate_slots(&GenerateSlots {
//!         schedule_id: schedule.id,
//!         start_date: "2024-01-01".to_string(),
//!         end_date: "2024-01-14".to_string(),
//!         duration_minutes: 30,
//!         break_minutes: 0,
//!         capacity: 1,
//!     })
//!     .await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod display;
pub mod engine;
pub mod error;
pub mod models;
pub mod params;
pub mod scheduler;

// Re-export commonly used types
pub use config::{Config, OpenExceptionPolicy};
pub use db::Database;
pub use display::{
    Dates, DeleteResult, LocalDateTime, OperationStatus, Schedules, Slots, UpdateResult,
    UpsertResult,
};
pub use engine::{GenerationReport, SlotStore};
pub use error::{Result, SchedulerError};
pub use models::{Exception, Schedule, ScheduleUpsert, Slot, TimeInterval, WeekdayKey, WeeklyPattern};
pub use scheduler::{Scheduler, SchedulerBuilder};
