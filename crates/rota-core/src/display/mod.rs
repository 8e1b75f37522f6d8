//! Markdown formatting for models and operation results.
//!
//! Domain models implement [`Display`](std::fmt::Display) directly (see
//! [`models`]); collections and operation outcomes are wrapped in newtypes so
//! each context gets its own layout.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrapper Types   │    │   Formatted     │
//! │ (Schedule, Slot)│───▶│ (Slots, Upsert- │───▶│    Output       │
//! │                 │    │  Result, ...)   │    │  (Terminal/MCP) │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! - [`collections`]: [`Schedules`], [`Slots`], [`Dates`]
//! - [`results`]: [`UpsertResult`], [`UpdateResult`], [`DeleteResult`] and the
//!   generation report
//! - [`status`]: [`OperationStatus`]
//! - [`datetime`]: [`LocalDateTime`]

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Dates, Schedules, Slots};
pub use datetime::LocalDateTime;
pub use results::{DeleteResult, UpdateResult, UpsertResult};
pub use status::OperationStatus;
