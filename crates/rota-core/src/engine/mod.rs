//! The availability engine.
//!
//! Turns a [`Schedule`](crate::models::Schedule) into concrete slots in three
//! pure steps plus one store call:
//!
//! ```text
//! date range ──▶ resolve(date) ──▶ partition(window) ──▶ SlotStore::reconcile
//!                 exceptions,        duration + break       insert / raise
//!                 weekly pattern                            capacity / keep
//! ```
//!
//! Nothing here touches SQLite directly; the [`SlotStore`] trait is the only
//! seam to persistence, implemented by [`Database`](crate::db::Database).

pub mod generate;
pub mod partition;
pub mod resolve;

pub use generate::{
    candidates_for_day, generate, GenerationReport, GenerationRequest, SlotLayout, SlotStore,
};
pub use partition::{expected_slot_count, partition};
pub use resolve::{available_dates, dates_between, resolve};
