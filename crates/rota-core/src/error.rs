//! Error types for the scheduling engine.

use std::path::PathBuf;

use rusqlite::ErrorCode;
use thiserror::Error;

/// Error type for every schedule, slot and storage operation.
///
/// The first group of variants are caller-visible input or state errors and
/// are never retried. Only [`SchedulerError::Database`] failures that report
/// a busy or locked database are considered transient.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// A numeric or textual argument is out of its allowed domain
    #[error("Invalid value for '{field}': {reason}")]
    InvalidParameter { field: String, reason: String },
    /// End date lies before start date
    #[error("Invalid date range: end date {end} is before start date {start}")]
    InvalidDateRange { start: String, end: String },
    /// Generation requested against a deleted or deactivated schedule
    #[error("Schedule {id} does not exist or is inactive")]
    ScheduleInactiveOrMissing { id: u64 },
    /// Mutation requested against a schedule that does not exist
    #[error("Schedule with ID {id} not found")]
    ScheduleNotFound { id: u64 },
    /// Slot edit requested against a slot that does not exist
    #[error("Slot with ID {id} not found")]
    SlotNotFound { id: u64 },
    /// Two intervals of the same day overlap or are out of order
    #[error("Overlapping intervals in {context}: {first} and {second}")]
    OverlappingIntervals {
        context: String,
        first: String,
        second: String,
    },
    /// Slot capacity would drop below the seats already booked
    #[error("Slot {slot_id} has {booked} booked seats; capacity {capacity} is too low")]
    CapacityBelowBooked {
        slot_id: u64,
        capacity: u32,
        booked: u32,
    },
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> SchedulerError {
        SchedulerError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating parameter validation errors.
pub struct InvalidParameterBuilder {
    field: String,
}

impl InvalidParameterBuilder {
    /// Create a new invalid parameter error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> SchedulerError {
        SchedulerError::InvalidParameter {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl SchedulerError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for parameter validation errors.
    pub fn invalid_parameter(field: impl Into<String>) -> InvalidParameterBuilder {
        InvalidParameterBuilder::new(field)
    }

    /// Whether the failure came from contention on the database and the
    /// operation may be attempted again.
    pub fn is_transient(&self) -> bool {
        match self {
            SchedulerError::Database {
                source: rusqlite::Error::SqliteFailure(err, _),
                ..
            } => matches!(
                err.code,
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }

    /// Whether the error was caused by caller input or stale state rather
    /// than infrastructure.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            SchedulerError::InvalidParameter { .. }
                | SchedulerError::InvalidDateRange { .. }
                | SchedulerError::ScheduleInactiveOrMissing { .. }
                | SchedulerError::ScheduleNotFound { .. }
                | SchedulerError::SlotNotFound { .. }
                | SchedulerError::OverlappingIntervals { .. }
                | SchedulerError::CapacityBelowBooked { .. }
        )
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| SchedulerError::database(message).with_source(e))
    }
}

/// Result type alias for scheduler operations
pub type Result<T> = std::result::Result<T, SchedulerError>;
