//! SQLite persistence for schedules, exceptions and slots.
//!
//! Schedule queries live in [`schedule_queries`], slot queries and the
//! [`SlotStore`](crate::engine::SlotStore) implementation in
//! [`slot_queries`]. Every multi-statement write runs in its own transaction.

use std::{path::Path, str::FromStr};

use rusqlite::{types::Type, Connection, Row};

use crate::{
    config::StorageConfig,
    error::{DatabaseResultExt, Result},
};

pub mod migrations;
pub mod schedule_queries;
pub mod slot_queries;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
    storage: StorageConfig,
}

impl Database {
    /// Opens the database with default storage settings and initializes the
    /// schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(path, &StorageConfig::default())
    }

    /// Opens the database, applying the busy timeout and retry settings from
    /// `storage`.
    pub fn open<P: AsRef<Path>>(path: P, storage: &StorageConfig) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        connection
            .busy_timeout(storage.busy_timeout())
            .db_context("Failed to set busy timeout")?;

        let db = Self {
            connection,
            storage: storage.clone(),
        };
        db.initialize_schema()?;
        Ok(db)
    }
}

/// Reads a text column and parses it, reporting failures as a column
/// conversion error.
pub(crate) fn parse_column<T>(row: &Row, index: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.get(index)?;
    text.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

/// Reads a JSON text column.
pub(crate) fn json_column<T: serde::de::DeserializeOwned>(
    row: &Row,
    index: usize,
) -> rusqlite::Result<T> {
    let text: String = row.get(index)?;
    serde_json::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

/// Reads a non-negative integer column into a `u32`.
pub(crate) fn count_column(row: &Row, index: usize) -> rusqlite::Result<u32> {
    let value: i64 = row.get(index)?;
    u32::try_from(value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Integer, Box::new(e)))
}
