//! The assignment generator — the heart of shiftdesk.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Primary assignment   (main-location employees)
//!   2. Substitution         (cover locations whose assignee is off)
//!   3. Floating fallback    (office / on-call duty)
//!
//! RULES:
//!   - Phases run to completion in order; phase N relies on phase N-1
//!     having fully populated the builder.
//!   - No phase ever removes an entry appended by an earlier phase;
//!     the set only grows.
//!   - The builder is the single writer. Nothing else mutates the
//!     accumulating set, and callers receive an immutable Vec.
//!   - Identical inputs produce an identical, order-stable output.

use chrono::NaiveDate;

use crate::calendar::{self, SATURDAY};
use crate::roster::{DayOffCalendar, RosterIndex};
use crate::types::Assignment;
use std::collections::HashSet;

/// Single-writer accumulator for a candidate set.
///
/// Tracks which locations are covered and which employees already work
/// on a given date, so later phases can honor the one-assignment-per-
/// employee-per-day invariant without rescanning the Vec.
struct AssignmentBuilder {
    assignments: Vec<Assignment>,
    covered:     HashSet<(String, NaiveDate)>, // (location, date)
    busy:        HashSet<(String, NaiveDate)>, // (employee, date), hours > 0
}

impl AssignmentBuilder {
    fn new() -> Self {
        Self {
            assignments: Vec::new(),
            covered: HashSet::new(),
            busy: HashSet::new(),
        }
    }

    fn location_covered(&self, location_id: &str, date: NaiveDate) -> bool {
        self.covered.contains(&(location_id.to_string(), date))
    }

    fn is_busy(&self, employee_id: &str, date: NaiveDate) -> bool {
        self.busy.contains(&(employee_id.to_string(), date))
    }

    /// Append a working assignment. Refuses a second hours>0 entry for
    /// the same (employee, date); the earlier phase wins.
    fn push_store(&mut self, date: NaiveDate, employee_id: &str, location_id: &str, hours: u8) {
        if self.is_busy(employee_id, date) {
            log::warn!("{employee_id} already works on {date}, not assigning {location_id}");
            return;
        }
        self.assignments
            .push(Assignment::store(date, employee_id, location_id, hours));
        self.covered.insert((location_id.to_string(), date));
        self.busy.insert((employee_id.to_string(), date));
    }

    fn push_day_off(&mut self, date: NaiveDate, employee_id: &str) {
        self.assignments.push(Assignment::day_off(date, employee_id));
    }

    fn finish(self) -> Vec<Assignment> {
        self.assignments
    }
}

/// Generate the candidate assignment set for one month.
///
/// Pure over its inputs: no I/O, no clock reads, bounded iteration.
pub fn generate(
    roster: &RosterIndex,
    day_offs: &DayOffCalendar,
    month0: u32,
    year: i32,
) -> Vec<Assignment> {
    let mut builder = AssignmentBuilder::new();
    phase_primary(&mut builder, roster, day_offs, month0, year);
    phase_substitution(&mut builder, roster, day_offs, month0, year);
    phase_floating_fallback(&mut builder, roster, day_offs, month0, year);
    builder.finish()
}

/// Phase 1 — every main-location employee either gets their location's
/// hours for the weekday or a day-off marker.
fn phase_primary(
    builder: &mut AssignmentBuilder,
    roster: &RosterIndex,
    day_offs: &DayOffCalendar,
    month0: u32,
    year: i32,
) {
    calendar::for_each_working_day(year, month0, |date, weekday| {
        for profile in &roster.profiles {
            let Some(location_id) = &profile.main_location else {
                continue;
            };
            if day_offs.is_off(&profile.id, date) {
                builder.push_day_off(date, &profile.id);
                continue;
            }
            let Some(location) = roster.location(location_id) else {
                log::warn!("{} is assigned to unknown location {location_id}", profile.id);
                continue;
            };
            let hours = location.weekday_hours.hours_on(weekday);
            if hours > 0 {
                builder.push_store(date, &profile.id, location_id, hours);
            }
        }
    });
}

/// Phase 2 — cover locations whose main assignee is off, using the
/// group's designated substitute. A substitute who is also off leaves
/// the location uncovered for the day; that gap is accepted.
fn phase_substitution(
    builder: &mut AssignmentBuilder,
    roster: &RosterIndex,
    day_offs: &DayOffCalendar,
    month0: u32,
    year: i32,
) {
    calendar::for_each_working_day(year, month0, |date, weekday| {
        for location in &roster.locations {
            let Some(assignee) = roster.main_assignee.get(&location.id) else {
                continue;
            };
            if !day_offs.is_off(assignee, date) {
                continue;
            }
            if builder.location_covered(&location.id, date) {
                continue;
            }
            let Some(group_id) = roster.group_of.get(&location.id) else {
                log::debug!("{} belongs to no substitution group", location.id);
                continue;
            };
            let Some(substitute) = roster.substitutes.get(group_id) else {
                log::debug!("group {group_id} has no designated substitute");
                continue;
            };
            if day_offs.is_off(substitute, date) {
                log::debug!("{} uncovered on {date}: substitute {substitute} is off", location.id);
                continue;
            }
            let hours = location.weekday_hours.hours_on(weekday);
            if hours == 0 {
                // Possibly a data bug rather than policy, hence the louder level.
                log::warn!("{} has 0 configured hours on {date}, substitution skipped", location.id);
                continue;
            }
            builder.push_store(date, substitute, &location.id, hours);
        }
    });
}

/// Phase 3 — the floating employee's fixed duty on days without a
/// substitution: on-call desk on Saturdays, office otherwise. A day-off
/// produces nothing at all, not even a marker.
fn phase_floating_fallback(
    builder: &mut AssignmentBuilder,
    roster: &RosterIndex,
    day_offs: &DayOffCalendar,
    month0: u32,
    year: i32,
) {
    let Some(floating) = &roster.floating else {
        log::debug!("roster has no floating employee, skipping fallback phase");
        return;
    };
    calendar::for_each_working_day(year, month0, |date, weekday| {
        if builder.is_busy(floating, date) {
            return;
        }
        if day_offs.is_off(floating, date) {
            return;
        }
        let location_id = if weekday == SATURDAY {
            &roster.fallback.on_call_location
        } else {
            &roster.fallback.office_location
        };
        builder.push_store(date, floating, location_id, roster.fallback.hours);
    });
}
