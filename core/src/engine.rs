//! The scheduling engine — ties generation, validation, persistence,
//! diffing, and notification together.
//!
//! EXECUTION ORDER for a generation run (fixed, never reordered):
//!   1. Resolve the roster.
//!   2. Generate the candidate set (3 generator phases).
//!   3. Validate the candidate set; any error stops the run here.
//!   4. Read the previously committed set.
//!   5. Commit: atomic delete-then-insert of the revision's rows.
//!   6. Diff previous vs committed for downstream notification.
//!
//! A failure anywhere before step 5 leaves the stored revision exactly
//! as it was.

use chrono::{Datelike, NaiveDate};

use crate::calendar::{weekday0, SUNDAY};
use crate::config::ScheduleConfig;
use crate::diff::{diff, RevisionDiff};
use crate::error::{ScheduleError, ScheduleResult};
use crate::generator::generate;
use crate::notify::{dispatch, Notifier};
use crate::roster::{DayOffCalendar, EmployeeRecord, LocationRecord, RosterIndex};
use crate::store::ScheduleStore;
use crate::types::{Assignment, RevisionId};
use crate::validator::validate;

/// What a generation run produced.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub revision_id: RevisionId,
    pub assignments: Vec<Assignment>,
    pub diff:        RevisionDiff,
}

pub struct ScheduleEngine {
    pub config: ScheduleConfig,
    pub store:  ScheduleStore,
}

impl ScheduleEngine {
    pub fn new(config: ScheduleConfig, store: ScheduleStore) -> Self {
        Self { config, store }
    }

    /// Engine over an in-memory store with the test config.
    /// Call this in tests instead of new() + manual wiring.
    pub fn build_test() -> ScheduleResult<Self> {
        let store = ScheduleStore::in_memory()?;
        store.migrate()?;
        Ok(Self::new(ScheduleConfig::default_test(), store))
    }

    /// Generate and commit the schedule for one month.
    pub fn generate_month(
        &mut self,
        employees: &[EmployeeRecord],
        locations: &[LocationRecord],
        day_offs: &DayOffCalendar,
        month0: u32,
        year: i32,
    ) -> ScheduleResult<GenerationOutcome> {
        let roster = RosterIndex::build(employees, locations, &self.config);
        let candidate = generate(&roster, day_offs, month0, year);
        validate(&candidate, month0, year, employees, locations)?;

        let previous = self
            .store
            .fetch_revision(month0, year)?
            .map(|r| r.assignments)
            .unwrap_or_default();

        let revision_id = self.store.upsert_revision(month0, year)?;
        self.store.replace_assignments(revision_id, &candidate)?;

        let changes = diff(&previous, &candidate);
        log::info!(
            "committed {}/{year}: {} assignments ({} added, {} updated, {} removed)",
            month0 + 1,
            candidate.len(),
            changes.added.len(),
            changes.updated.len(),
            changes.removed.len(),
        );

        Ok(GenerationOutcome {
            revision_id,
            assignments: candidate,
            diff: changes,
        })
    }

    // ── Single-assignment edits ───────────────────────────────

    /// Insert or overwrite one assignment in a committed revision.
    pub fn upsert_assignment(
        &mut self,
        month0: u32,
        year: i32,
        assignment: &Assignment,
        employees: &[EmployeeRecord],
        locations: &[LocationRecord],
    ) -> ScheduleResult<()> {
        let revision_id = self.require_revision(month0, year)?;

        if !employees
            .iter()
            .any(|e| e.is_active && e.id == assignment.employee_id)
        {
            return Err(ScheduleError::NotFound {
                what: format!("employee {}", assignment.employee_id),
            });
        }
        if let Some(location_id) = &assignment.location_id {
            if !locations.iter().any(|l| l.is_active && l.id == *location_id) {
                return Err(ScheduleError::NotFound {
                    what: format!("location {location_id}"),
                });
            }
        }
        if assignment.date.year() != year || assignment.date.month0() != month0 {
            return Err(ScheduleError::Validation {
                date: assignment.date,
                employee_id: assignment.employee_id.clone(),
                reason: "date outside the revision's month".into(),
            });
        }
        if assignment.hours > 24 {
            return Err(ScheduleError::Validation {
                date: assignment.date,
                employee_id: assignment.employee_id.clone(),
                reason: format!("{} hours exceeds a day", assignment.hours),
            });
        }
        if weekday0(assignment.date) == SUNDAY && assignment.hours > 0 {
            return Err(ScheduleError::Validation {
                date: assignment.date,
                employee_id: assignment.employee_id.clone(),
                reason: "nonzero hours on a Sunday".into(),
            });
        }

        self.store.upsert_assignment(revision_id, assignment)
    }

    /// Remove one assignment from a committed revision.
    pub fn remove_assignment(
        &mut self,
        month0: u32,
        year: i32,
        employee_id: &str,
        date: NaiveDate,
    ) -> ScheduleResult<()> {
        let revision_id = self.require_revision(month0, year)?;
        let deleted = self.store.delete_assignment(revision_id, employee_id, date)?;
        if deleted == 0 {
            return Err(ScheduleError::NotFound {
                what: format!("assignment for {employee_id} on {date}"),
            });
        }
        Ok(())
    }

    // ── Ready gate ────────────────────────────────────────────

    /// One-way gate: a ready revision is eligible for notification
    /// dispatch. Reverting is an explicit separate operation.
    pub fn mark_ready(&self, month0: u32, year: i32) -> ScheduleResult<()> {
        self.store.set_ready(month0, year, true)
    }

    pub fn revert_ready(&self, month0: u32, year: i32) -> ScheduleResult<()> {
        self.store.set_ready(month0, year, false)
    }

    // ── Notification ──────────────────────────────────────────

    /// Dispatch per-employee change summaries for a committed, ready
    /// revision. A revision that is not ready dispatches nothing.
    /// Returns the number of summaries delivered.
    pub fn notify_changes(
        &self,
        month0: u32,
        year: i32,
        changes: &RevisionDiff,
        notifier: &dyn Notifier,
    ) -> ScheduleResult<usize> {
        if !self.store.is_ready(month0, year)? {
            log::debug!("revision {}/{year} is not ready, skipping dispatch", month0 + 1);
            return Ok(0);
        }
        Ok(dispatch(changes, notifier))
    }

    fn require_revision(&self, month0: u32, year: i32) -> ScheduleResult<RevisionId> {
        self.store
            .revision_id(month0, year)?
            .ok_or_else(|| ScheduleError::NotFound {
                what: format!("revision {}/{year}", month0 + 1),
            })
    }
}
