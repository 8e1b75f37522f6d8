//! Schedule and exception CRUD operations.

use std::collections::BTreeMap;

use jiff::{civil::Date, Timestamp};
use rusqlite::{params, OptionalExtension, Row};

use super::{json_column, parse_column};
use crate::{
    error::{DatabaseResultExt, Result, SchedulerError},
    models::{Exception, Schedule, ScheduleFilter, ScheduleUpsert, WeeklyPattern},
};

const SCHEDULE_COLUMNS: &str =
    "id, org_id, agent_id, org_service_id, weekly_pattern, is_active, created_at, updated_at";
const SELECT_SCHEDULE_SQL: &str = "SELECT id, org_id, agent_id, org_service_id, weekly_pattern, is_active, created_at, updated_at FROM schedules WHERE id = ?1";
const FIND_SCHEDULE_BY_SCOPE_SQL: &str = "SELECT id FROM schedules WHERE org_id = ?1 AND agent_id = ?2 AND COALESCE(org_service_id, '') = COALESCE(?3, '')";
const CHECK_SCHEDULE_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM schedules WHERE id = ?1)";
const INSERT_SCHEDULE_SQL: &str = "INSERT INTO schedules (org_id, agent_id, org_service_id, weekly_pattern, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)";
const UPDATE_SCHEDULE_PATTERN_SQL: &str =
    "UPDATE schedules SET weekly_pattern = ?1, updated_at = ?2 WHERE id = ?3";
const TOGGLE_SCHEDULE_SQL: &str =
    "UPDATE schedules SET is_active = 1 - is_active, updated_at = ?1 WHERE id = ?2";
const SELECT_SCHEDULE_ACTIVE_SQL: &str = "SELECT is_active FROM schedules WHERE id = ?1";
const TOUCH_SCHEDULE_SQL: &str = "UPDATE schedules SET updated_at = ?1 WHERE id = ?2";
const DELETE_SCHEDULE_SQL: &str = "DELETE FROM schedules WHERE id = ?1";

const SELECT_EXCEPTIONS_SQL: &str = "SELECT date, available, intervals, reason FROM schedule_exceptions WHERE schedule_id = ?1 ORDER BY date";
const UPSERT_EXCEPTION_SQL: &str = "INSERT INTO schedule_exceptions (schedule_id, date, available, intervals, reason) VALUES (?1, ?2, ?3, ?4, ?5) ON CONFLICT(schedule_id, date) DO UPDATE SET available = excluded.available, intervals = excluded.intervals, reason = excluded.reason";
const DELETE_EXCEPTION_SQL: &str =
    "DELETE FROM schedule_exceptions WHERE schedule_id = ?1 AND date = ?2";

impl super::Database {
    /// Builds a schedule (without exceptions) from a row of
    /// [`SCHEDULE_COLUMNS`].
    fn build_schedule_from_row(row: &Row) -> rusqlite::Result<Schedule> {
        Ok(Schedule {
            id: row.get::<_, i64>(0)? as u64,
            org_id: row.get(1)?,
            agent_id: row.get(2)?,
            org_service_id: row.get(3)?,
            weekly_pattern: json_column::<WeeklyPattern>(row, 4)?,
            is_active: row.get(5)?,
            exceptions: BTreeMap::new(),
            created_at: parse_column::<Timestamp>(row, 6)?,
            updated_at: parse_column::<Timestamp>(row, 7)?,
        })
    }

    fn build_exception_from_row(row: &Row) -> rusqlite::Result<Exception> {
        let intervals: Option<String> = row.get(2)?;
        let intervals = intervals
            .map(|json| {
                serde_json::from_str(&json).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        2,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })
            })
            .transpose()?;

        Ok(Exception {
            date: parse_column::<Date>(row, 0)?,
            available: row.get(1)?,
            intervals,
            reason: row.get(3)?,
        })
    }

    fn schedule_exists(&self, id: u64) -> Result<bool> {
        self.connection
            .query_row(CHECK_SCHEDULE_EXISTS_SQL, params![id as i64], |row| row.get(0))
            .db_context("Failed to check schedule existence")
    }

    fn load_exceptions(&self, schedule_id: u64) -> Result<BTreeMap<Date, Exception>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_EXCEPTIONS_SQL)
            .db_context("Failed to prepare exception query")?;

        let exceptions = stmt
            .query_map(params![schedule_id as i64], Self::build_exception_from_row)
            .db_context("Failed to query exceptions")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read exception rows")?;

        Ok(exceptions.into_iter().map(|e| (e.date, e)).collect())
    }

    /// Creates the schedule for (org, agent, service), or replaces the weekly
    /// pattern of the existing one. Activity and exceptions are preserved on
    /// update.
    pub fn upsert_schedule(
        &mut self,
        org_id: &str,
        agent_id: &str,
        org_service_id: Option<&str>,
        pattern: &WeeklyPattern,
    ) -> Result<ScheduleUpsert> {
        let pattern_json = serde_json::to_string(pattern)?;
        let now = Timestamp::now().to_string();

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let existing: Option<i64> = tx
            .query_row(
                FIND_SCHEDULE_BY_SCOPE_SQL,
                params![org_id, agent_id, org_service_id],
                |row| row.get(0),
            )
            .optional()
            .db_context("Failed to look up schedule")?;

        let (id, created) = match existing {
            Some(id) => {
                tx.execute(UPDATE_SCHEDULE_PATTERN_SQL, params![pattern_json, now, id])
                    .db_context("Failed to update weekly pattern")?;
                (id as u64, false)
            }
            None => {
                tx.execute(
                    INSERT_SCHEDULE_SQL,
                    params![org_id, agent_id, org_service_id, pattern_json, now],
                )
                .db_context("Failed to insert schedule")?;
                (tx.last_insert_rowid() as u64, true)
            }
        };

        tx.commit().db_context("Failed to commit transaction")?;

        let schedule = self
            .get_schedule(id)?
            .ok_or(SchedulerError::ScheduleNotFound { id })?;
        Ok(ScheduleUpsert { schedule, created })
    }

    /// Retrieves a schedule with its exceptions.
    pub fn get_schedule(&self, id: u64) -> Result<Option<Schedule>> {
        let schedule = self
            .connection
            .query_row(
                SELECT_SCHEDULE_SQL,
                params![id as i64],
                Self::build_schedule_from_row,
            )
            .optional()
            .db_context("Failed to query schedule")?;

        match schedule {
            Some(mut schedule) => {
                schedule.exceptions = self.load_exceptions(schedule.id)?;
                Ok(Some(schedule))
            }
            None => Ok(None),
        }
    }

    /// Lists an organization's schedules, oldest first.
    pub fn list_schedules(&self, filter: &ScheduleFilter) -> Result<Vec<Schedule>> {
        let mut query = format!("SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE org_id = ?");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(filter.org_id.clone())];

        if let Some(ref service) = filter.org_service_id {
            query.push_str(" AND (org_service_id IS NULL OR org_service_id = ?)");
            params_vec.push(Box::new(service.clone()));
        }

        if let Some(ref agent) = filter.agent_id {
            query.push_str(" AND agent_id = ?");
            params_vec.push(Box::new(agent.clone()));
        }

        if filter.active_only {
            query.push_str(" AND is_active = 1");
        }

        query.push_str(" ORDER BY id");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let mut schedules = stmt
            .query_map(&params_refs[..], Self::build_schedule_from_row)
            .db_context("Failed to query schedules")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read schedule rows")?;

        for schedule in &mut schedules {
            schedule.exceptions = self.load_exceptions(schedule.id)?;
        }

        Ok(schedules)
    }

    /// Flips `is_active` and returns the new value.
    pub fn toggle_schedule(&mut self, id: u64) -> Result<bool> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let rows = tx
            .execute(
                TOGGLE_SCHEDULE_SQL,
                params![Timestamp::now().to_string(), id as i64],
            )
            .db_context("Failed to toggle schedule")?;
        if rows == 0 {
            return Err(SchedulerError::ScheduleNotFound { id });
        }

        let is_active: bool = tx
            .query_row(SELECT_SCHEDULE_ACTIVE_SQL, params![id as i64], |row| {
                row.get(0)
            })
            .db_context("Failed to read schedule state")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(is_active)
    }

    /// Stores `exception`, replacing any exception already set for its date.
    pub fn add_exception(&mut self, schedule_id: u64, exception: &Exception) -> Result<Schedule> {
        let intervals_json = exception
            .replacement_hours()
            .map(serde_json::to_string)
            .transpose()?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let exists: bool = tx
            .query_row(
                CHECK_SCHEDULE_EXISTS_SQL,
                params![schedule_id as i64],
                |row| row.get(0),
            )
            .db_context("Failed to check schedule existence")?;
        if !exists {
            return Err(SchedulerError::ScheduleNotFound { id: schedule_id });
        }

        tx.execute(
            UPSERT_EXCEPTION_SQL,
            params![
                schedule_id as i64,
                exception.date.to_string(),
                exception.available,
                intervals_json,
                exception.reason
            ],
        )
        .db_context("Failed to store exception")?;

        tx.execute(
            TOUCH_SCHEDULE_SQL,
            params![Timestamp::now().to_string(), schedule_id as i64],
        )
        .db_context("Failed to update schedule timestamp")?;

        tx.commit().db_context("Failed to commit transaction")?;

        self.get_schedule(schedule_id)?
            .ok_or(SchedulerError::ScheduleNotFound { id: schedule_id })
    }

    /// Removes the exception for `date`. Returns whether one existed.
    pub fn remove_exception(&mut self, schedule_id: u64, date: Date) -> Result<bool> {
        if !self.schedule_exists(schedule_id)? {
            return Err(SchedulerError::ScheduleNotFound { id: schedule_id });
        }

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let removed = tx
            .execute(
                DELETE_EXCEPTION_SQL,
                params![schedule_id as i64, date.to_string()],
            )
            .db_context("Failed to delete exception")?;

        if removed > 0 {
            tx.execute(
                TOUCH_SCHEDULE_SQL,
                params![Timestamp::now().to_string(), schedule_id as i64],
            )
            .db_context("Failed to update schedule timestamp")?;
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(removed > 0)
    }

    /// Deletes a schedule and its exceptions. Generated slots are kept.
    pub fn delete_schedule(&mut self, id: u64) -> Result<()> {
        let rows = self
            .connection
            .execute(DELETE_SCHEDULE_SQL, params![id as i64])
            .db_context("Failed to delete schedule")?;

        if rows == 0 {
            return Err(SchedulerError::ScheduleNotFound { id });
        }
        Ok(())
    }
}
