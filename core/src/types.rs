//! Shared primitive types used across the entire engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A stable, unique employee identifier.
pub type EmployeeId = String;

/// A stable, unique work-location identifier.
pub type LocationId = String;

/// A substitution-group identifier.
pub type GroupId = String;

/// Database row id of a committed schedule revision.
pub type RevisionId = i64;

/// What an assignment row means for the employee on that day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentKind {
    /// Working hours at a location.
    Store,
    /// Day-off marker for the employee's own record. Carries no hours.
    DayOff,
}

impl AssignmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentKind::Store => "store",
            AssignmentKind::DayOff => "day_off",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "store" => Some(AssignmentKind::Store),
            "day_off" => Some(AssignmentKind::DayOff),
            _ => None,
        }
    }
}

/// One employee, one calendar day.
///
/// `location_id` is `None` only for day-off markers; a `Store`
/// assignment always names a location and its hours for that weekday.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Assignment {
    pub date:        NaiveDate,
    pub employee_id: EmployeeId,
    pub location_id: Option<LocationId>,
    pub hours:       u8,
    pub kind:        AssignmentKind,
}

impl Assignment {
    pub fn store(date: NaiveDate, employee_id: &str, location_id: &str, hours: u8) -> Self {
        Self {
            date,
            employee_id: employee_id.to_string(),
            location_id: Some(location_id.to_string()),
            hours,
            kind: AssignmentKind::Store,
        }
    }

    pub fn day_off(date: NaiveDate, employee_id: &str) -> Self {
        Self {
            date,
            employee_id: employee_id.to_string(),
            location_id: None,
            hours: 0,
            kind: AssignmentKind::DayOff,
        }
    }
}

/// The complete assignment set for one month/year, as committed.
///
/// A revision owns its assignments exclusively. Replacing a revision is
/// always a full delete-then-insert inside one store transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRevision {
    pub id:          RevisionId,
    pub month0:      u32,
    pub year:        i32,
    pub ready:       bool,
    pub assignments: Vec<Assignment>,
}
