//! Conflict validation — the gate every candidate set passes before
//! commit.
//!
//! RULE: validation is pure and all-or-nothing. The first violation
//! rejects the whole set; nothing is ever partially accepted.

use chrono::{Datelike, NaiveDate};
use std::collections::{HashMap, HashSet};

use crate::calendar::{weekday0, SUNDAY};
use crate::error::{ScheduleError, ScheduleResult};
use crate::roster::{EmployeeRecord, LocationRecord};
use crate::types::Assignment;

fn reject(date: NaiveDate, employee_id: &str, reason: impl Into<String>) -> ScheduleError {
    ScheduleError::Validation {
        date,
        employee_id: employee_id.to_string(),
        reason: reason.into(),
    }
}

/// Check a candidate set against the scheduling invariants.
///
/// Runs to completion over every assignment before any commit happens;
/// the caller must not persist anything when this returns an error.
pub fn validate(
    candidate: &[Assignment],
    month0: u32,
    year: i32,
    employees: &[EmployeeRecord],
    locations: &[LocationRecord],
) -> ScheduleResult<()> {
    let known_employees: HashSet<&str> = employees
        .iter()
        .filter(|e| e.is_active)
        .map(|e| e.id.as_str())
        .collect();
    let known_locations: HashSet<&str> = locations
        .iter()
        .filter(|l| l.is_active)
        .map(|l| l.id.as_str())
        .collect();

    // date → employees already seen with hours > 0 on that date.
    let mut working: HashMap<NaiveDate, HashSet<&str>> = HashMap::new();

    for assignment in candidate {
        let date = assignment.date;
        let employee_id = assignment.employee_id.as_str();

        if date.year() != year || date.month0() != month0 {
            return Err(reject(date, employee_id, "date outside the target month"));
        }
        if assignment.hours > 24 {
            return Err(reject(
                date,
                employee_id,
                format!("{} hours exceeds a day", assignment.hours),
            ));
        }
        if weekday0(date) == SUNDAY && assignment.hours > 0 {
            return Err(reject(date, employee_id, "nonzero hours on a Sunday"));
        }
        if !known_employees.contains(employee_id) {
            return Err(reject(date, employee_id, "unknown or inactive employee"));
        }
        if let Some(location_id) = &assignment.location_id {
            if !known_locations.contains(location_id.as_str()) {
                return Err(reject(
                    date,
                    employee_id,
                    format!("unknown or inactive location {location_id}"),
                ));
            }
        }

        if assignment.hours > 0 {
            let seen = working.entry(date).or_default();
            if !seen.insert(employee_id) {
                return Err(reject(
                    date,
                    employee_id,
                    "employee already has a working assignment on this date",
                ));
            }
        }
    }

    Ok(())
}
