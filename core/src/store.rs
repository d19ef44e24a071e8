//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database. The engine calls store
//! methods; it never executes SQL directly.
//!
//! Replacing a revision's assignments is one transaction: DELETE all
//! rows, INSERT the new set. A reader never observes a half-replaced
//! revision.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{ScheduleError, ScheduleResult};
use crate::types::{Assignment, AssignmentKind, RevisionId, ScheduleRevision};

pub struct ScheduleStore {
    conn: Connection,
}

impl ScheduleStore {
    /// Open (or create) the schedule database at `path`.
    pub fn open(path: &str) -> ScheduleResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: better concurrent read performance.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ScheduleResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> ScheduleResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_schedule.sql"))?;
        Ok(())
    }

    // ── Revision ──────────────────────────────────────────────

    /// Fetch-or-create the revision row for a month/year.
    pub fn upsert_revision(&self, month0: u32, year: i32) -> ScheduleResult<RevisionId> {
        self.conn.execute(
            "INSERT OR IGNORE INTO revision (month0, year) VALUES (?1, ?2)",
            params![month0, year],
        )?;
        let id = self.conn.query_row(
            "SELECT id FROM revision WHERE month0 = ?1 AND year = ?2",
            params![month0, year],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    pub fn revision_id(&self, month0: u32, year: i32) -> ScheduleResult<Option<RevisionId>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM revision WHERE month0 = ?1 AND year = ?2",
                params![month0, year],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    /// Fetch a committed revision with its assignments, ordered by
    /// (date, employee_id).
    pub fn fetch_revision(&self, month0: u32, year: i32) -> ScheduleResult<Option<ScheduleRevision>> {
        let header = self
            .conn
            .query_row(
                "SELECT id, ready FROM revision WHERE month0 = ?1 AND year = ?2",
                params![month0, year],
                |row| Ok((row.get::<_, RevisionId>(0)?, row.get::<_, i64>(1)? != 0)),
            )
            .optional()?;
        let Some((id, ready)) = header else {
            return Ok(None);
        };
        let assignments = self.assignments_for(id)?;
        Ok(Some(ScheduleRevision {
            id,
            month0,
            year,
            ready,
            assignments,
        }))
    }

    pub fn assignments_for(&self, revision_id: RevisionId) -> ScheduleResult<Vec<Assignment>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, employee_id, location_id, hours, kind
             FROM assignment WHERE revision_id = ?1
             ORDER BY date ASC, employee_id ASC",
        )?;
        let rows = stmt
            .query_map(params![revision_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(date, employee_id, location_id, hours, kind)| {
                Ok(Assignment {
                    date: parse_date(&date)?,
                    employee_id,
                    location_id,
                    hours: hours as u8,
                    kind: AssignmentKind::parse(&kind)
                        .ok_or_else(|| anyhow::anyhow!("unknown assignment kind {kind}"))?,
                })
            })
            .collect()
    }

    /// Atomically replace every assignment of a revision.
    pub fn replace_assignments(
        &mut self,
        revision_id: RevisionId,
        assignments: &[Assignment],
    ) -> ScheduleResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM assignment WHERE revision_id = ?1",
            params![revision_id],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO assignment (revision_id, date, employee_id, location_id, hours, kind)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for a in assignments {
                stmt.execute(params![
                    revision_id,
                    a.date.to_string(),
                    a.employee_id,
                    a.location_id,
                    a.hours as i64,
                    a.kind.as_str(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    // ── Single-assignment edits ───────────────────────────────

    /// Insert or overwrite the one assignment for (employee, date)
    /// within a revision.
    pub fn upsert_assignment(
        &mut self,
        revision_id: RevisionId,
        assignment: &Assignment,
    ) -> ScheduleResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM assignment
             WHERE revision_id = ?1 AND employee_id = ?2 AND date = ?3",
            params![revision_id, assignment.employee_id, assignment.date.to_string()],
        )?;
        tx.execute(
            "INSERT INTO assignment (revision_id, date, employee_id, location_id, hours, kind)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                revision_id,
                assignment.date.to_string(),
                assignment.employee_id,
                assignment.location_id,
                assignment.hours as i64,
                assignment.kind.as_str(),
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Delete the assignment for (employee, date). Returns how many
    /// rows went away (0 or 1).
    pub fn delete_assignment(
        &self,
        revision_id: RevisionId,
        employee_id: &str,
        date: NaiveDate,
    ) -> ScheduleResult<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM assignment
             WHERE revision_id = ?1 AND employee_id = ?2 AND date = ?3",
            params![revision_id, employee_id, date.to_string()],
        )?;
        Ok(deleted)
    }

    // ── Ready gate ────────────────────────────────────────────

    pub fn set_ready(&self, month0: u32, year: i32, ready: bool) -> ScheduleResult<()> {
        let updated = self.conn.execute(
            "UPDATE revision SET ready = ?1 WHERE month0 = ?2 AND year = ?3",
            params![ready as i64, month0, year],
        )?;
        if updated == 0 {
            return Err(ScheduleError::NotFound {
                what: format!("revision {}/{year}", month0 + 1),
            });
        }
        Ok(())
    }

    pub fn is_ready(&self, month0: u32, year: i32) -> ScheduleResult<bool> {
        let ready = self
            .conn
            .query_row(
                "SELECT ready FROM revision WHERE month0 = ?1 AND year = ?2",
                params![month0, year],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(ready.unwrap_or(0) != 0)
    }
}

fn parse_date(s: &str) -> ScheduleResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| ScheduleError::Other(anyhow::anyhow!("bad date {s} in store: {e}")))
}
