//! High-level async API over schedules and slots.
//!
//! The [`Scheduler`] is the entry point used by every interface. Each call
//! opens a fresh connection on a blocking thread, loads whatever it needs
//! (schedules are never cached) and runs one operation.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Scheduler     │    │     engine      │    │    Database     │
//! │ (schedule_ops,  │───▶│ (resolve,       │───▶│   (via db/,     │
//! │  slot_ops)      │    │  partition, ..) │    │    SlotStore)   │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!    params in, models     pure functions         SQLite, retries
//! ```
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use rota_core::{
//!     params::{DaySchedule, GenerateSlots, TimeRange, UpsertSchedule},
//!     models::WeekdayKey,
//!     SchedulerBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let scheduler = SchedulerBuilder::new()
//!     .with_database_path(Some("/tmp/rota.db"))
//!     .build()
//!     .await?;
//!
//! let upsert = scheduler
//!     .upsert_schedule(&UpsertSchedule {
//!         org_id: "org-1".to_string(),
//!         agent_id: "agent-a".to_string(),
//!         org_service_id: None,
//!         weekly_pattern: vec![DaySchedule {
//!             day: WeekdayKey::Monday,
//!             time_ranges: vec![TimeRange::new("09:00", "12:00")],
//!         }],
//!     })
//!     .await?;
//!
//! let report = scheduler
//!     .generate_slots(&GenerateSlots {
//!         schedule_id: upsert.schedule.id,
//!         start_date: "2024-01-01".to_string(),
//!         end_date: "2024-01-14".to_string(),
//!         duration_minutes: 60,
//!         break_minutes: 0,
//!         capacity: 2,
//!     })
//!     .await?;
//! println!("{} slots created", report.slots_created);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use tokio::task;

use crate::{
    config::Config,
    db::Database,
    error::{Result, SchedulerError},
};

pub mod builder;
pub mod schedule_ops;
pub mod slot_ops;


pub use builder::SchedulerBuilder;

/// Main interface for managing schedules and generating slots.
pub struct Scheduler {
    pub(crate) db_path: PathBuf,
    pub(crate) config: Config,
}

impl Scheduler {
    pub(crate) fn new(db_path: PathBuf, config: Config) -> Self {
        Self { db_path, config }
    }

    /// Active configuration, e.g. for interface-level defaults.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs `op` against a fresh connection on the blocking pool.
    pub(crate) async fn with_database<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = self.db_path.clone();
        let storage = self.config.storage.clone();

        task::spawn_blocking(move || {
            let mut db = Database::open(&db_path, &storage)?;
            op(&mut db)
        })
        .await
        .map_err(|e| SchedulerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
