//! Slot reconciliation, queries and seat bookkeeping.

use jiff::{
    civil::{Date, Time},
    Timestamp,
};
use log::{debug, warn};
use rusqlite::{params, OptionalExtension, Row, TransactionBehavior};

use super::{count_column, parse_column};
use crate::{
    engine::SlotStore,
    error::{DatabaseResultExt, Result, SchedulerError},
    models::{Reconciliation, Slot, SlotCandidate, SlotFilter},
};

const SLOT_COLUMNS: &str = "id, schedule_id, agent_id, org_service_id, date, start_time, end_time, capacity, booked_count, created_at, updated_at";
const SELECT_SLOT_SQL: &str = "SELECT id, schedule_id, agent_id, org_service_id, date, start_time, end_time, capacity, booked_count, created_at, updated_at FROM slots WHERE id = ?1";
const INSERT_SLOT_IF_ABSENT_SQL: &str = "INSERT INTO slots (schedule_id, agent_id, org_service_id, date, start_time, end_time, capacity, booked_count, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?8) ON CONFLICT(agent_id, date, start_time) DO NOTHING";
const SELECT_SLOT_CAPACITY_BY_KEY_SQL: &str =
    "SELECT capacity FROM slots WHERE agent_id = ?1 AND date = ?2 AND start_time = ?3";
const RAISE_SLOT_CAPACITY_SQL: &str = "UPDATE slots SET capacity = ?1, updated_at = ?2 WHERE agent_id = ?3 AND date = ?4 AND start_time = ?5 AND capacity < ?1";
const SELECT_SLOT_BOOKED_SQL: &str = "SELECT booked_count FROM slots WHERE id = ?1";
const UPDATE_SLOT_CAPACITY_SQL: &str =
    "UPDATE slots SET capacity = ?1, updated_at = ?2 WHERE id = ?3";
const CLAIM_SEAT_SQL: &str = "UPDATE slots SET booked_count = booked_count + 1, updated_at = ?1 WHERE id = ?2 AND booked_count < capacity";
const RELEASE_SEAT_SQL: &str = "UPDATE slots SET booked_count = booked_count - 1, updated_at = ?1 WHERE id = ?2 AND booked_count > 0";
const CHECK_SLOT_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM slots WHERE id = ?1)";

impl super::Database {
    /// Helper function to construct a Slot from a row of [`SLOT_COLUMNS`]
    fn build_slot_from_row(row: &Row) -> rusqlite::Result<Slot> {
        Ok(Slot {
            id: row.get::<_, i64>(0)? as u64,
            schedule_id: row.get::<_, i64>(1)? as u64,
            agent_id: row.get(2)?,
            org_service_id: row.get(3)?,
            date: parse_column::<Date>(row, 4)?,
            start: parse_column::<Time>(row, 5)?,
            end: parse_column::<Time>(row, 6)?,
            capacity: count_column(row, 7)?,
            booked_count: count_column(row, 8)?,
            created_at: parse_column::<Timestamp>(row, 9)?,
            updated_at: parse_column::<Timestamp>(row, 10)?,
        })
    }

    /// Reconciles one candidate, retrying while the database reports busy
    /// or locked.
    pub fn reconcile_slot(&mut self, candidate: &SlotCandidate) -> Result<Reconciliation> {
        let mut attempt = 0;
        loop {
            match self.try_reconcile_slot(candidate) {
                Err(e) if e.is_transient() && attempt < self.storage.max_retries => {
                    attempt += 1;
                    warn!(
                        "Slot {} {} {} contended, retry {attempt}/{}: {e}",
                        candidate.agent_id, candidate.date, candidate.interval, self.storage.max_retries
                    );
                    std::thread::sleep(self.storage.backoff(attempt));
                }
                outcome => return outcome,
            }
        }
    }

    /// Insert-if-absent, then raise-if-lower, under one write lock.
    ///
    /// `BEGIN IMMEDIATE` takes the write lock up front, so two writers
    /// reconciling the same key serialize instead of both reading "absent".
    fn try_reconcile_slot(&mut self, candidate: &SlotCandidate) -> Result<Reconciliation> {
        let now = Timestamp::now().to_string();
        let date = candidate.date.to_string();
        let start = candidate.interval.start.to_string();

        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin slot transaction")?;

        let inserted = tx
            .execute(
                INSERT_SLOT_IF_ABSENT_SQL,
                params![
                    candidate.schedule_id as i64,
                    candidate.agent_id,
                    candidate.org_service_id,
                    date,
                    start,
                    candidate.interval.end.to_string(),
                    candidate.capacity,
                    now
                ],
            )
            .db_context("Failed to insert slot")?;

        let outcome = if inserted > 0 {
            Reconciliation::Created
        } else {
            let previous: u32 = tx
                .query_row(
                    SELECT_SLOT_CAPACITY_BY_KEY_SQL,
                    params![candidate.agent_id, date, start],
                    |row| row.get(0),
                )
                .db_context("Failed to read existing slot")?;

            if previous < candidate.capacity {
                tx.execute(
                    RAISE_SLOT_CAPACITY_SQL,
                    params![candidate.capacity, now, candidate.agent_id, date, start],
                )
                .db_context("Failed to raise slot capacity")?;
                Reconciliation::Upgraded {
                    previous_capacity: previous,
                }
            } else {
                Reconciliation::Unchanged
            }
        };

        tx.commit().db_context("Failed to commit slot transaction")?;
        Ok(outcome)
    }

    /// Retrieves a slot by its ID.
    pub fn get_slot(&self, id: u64) -> Result<Option<Slot>> {
        self.connection
            .query_row(SELECT_SLOT_SQL, params![id as i64], Self::build_slot_from_row)
            .optional()
            .db_context("Failed to query slot")
    }

    /// Lists slots ordered by date, start time and agent.
    pub fn list_slots(&self, filter: &SlotFilter) -> Result<Vec<Slot>> {
        let mut query = format!("SELECT {SLOT_COLUMNS} FROM slots");

        let mut conditions = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(schedule_id) = filter.schedule_id {
            conditions.push("schedule_id = ?");
            params_vec.push(Box::new(schedule_id as i64));
        }

        if let Some(ref agent) = filter.agent_id {
            conditions.push("agent_id = ?");
            params_vec.push(Box::new(agent.clone()));
        }

        if let Some(ref service) = filter.org_service_id {
            conditions.push("(org_service_id IS NULL OR org_service_id = ?)");
            params_vec.push(Box::new(service.clone()));
        }

        if let Some(from) = filter.from {
            conditions.push("date >= ?");
            params_vec.push(Box::new(from.to_string()));
        }

        if let Some(to) = filter.to {
            conditions.push("date <= ?");
            params_vec.push(Box::new(to.to_string()));
        }

        if filter.only_open {
            conditions.push("booked_count < capacity");
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(" ORDER BY date, start_time, agent_id");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let slots = stmt
            .query_map(&params_refs[..], Self::build_slot_from_row)
            .db_context("Failed to query slots")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read slot rows")?;

        Ok(slots)
    }

    /// Sets a slot's capacity. Unlike reconciliation this may lower it, but
    /// never below the seats already booked.
    pub fn set_slot_capacity(&mut self, id: u64, capacity: u32) -> Result<Slot> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let booked: Option<u32> = tx
            .query_row(SELECT_SLOT_BOOKED_SQL, params![id as i64], |row| row.get(0))
            .optional()
            .db_context("Failed to read slot bookings")?;

        let booked = booked.ok_or(SchedulerError::SlotNotFound { id })?;
        if capacity < booked {
            return Err(SchedulerError::CapacityBelowBooked {
                slot_id: id,
                capacity,
                booked,
            });
        }

        tx.execute(
            UPDATE_SLOT_CAPACITY_SQL,
            params![capacity, Timestamp::now().to_string(), id as i64],
        )
        .db_context("Failed to update slot capacity")?;

        tx.commit().db_context("Failed to commit transaction")?;

        self.get_slot(id)?.ok_or(SchedulerError::SlotNotFound { id })
    }

    /// Atomically books one seat. Returns `false` when the slot is full.
    pub fn claim_seat(&mut self, id: u64) -> Result<bool> {
        self.adjust_seats(CLAIM_SEAT_SQL, id, "claim")
    }

    /// Atomically frees one seat. Returns `false` when nothing was booked.
    pub fn release_seat(&mut self, id: u64) -> Result<bool> {
        self.adjust_seats(RELEASE_SEAT_SQL, id, "release")
    }

    fn adjust_seats(&mut self, sql: &str, id: u64, action: &str) -> Result<bool> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let rows = tx
            .execute(sql, params![Timestamp::now().to_string(), id as i64])
            .db_context("Failed to update seats")?;

        if rows == 0 {
            let exists: bool = tx
                .query_row(CHECK_SLOT_EXISTS_SQL, params![id as i64], |row| row.get(0))
                .db_context("Failed to check slot existence")?;
            if !exists {
                return Err(SchedulerError::SlotNotFound { id });
            }
            debug!("Seat {action} on slot {id} had no effect");
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(rows > 0)
    }
}

impl SlotStore for super::Database {
    fn reconcile(&mut self, candidate: &SlotCandidate) -> Result<Reconciliation> {
        self.reconcile_slot(candidate)
    }
}
