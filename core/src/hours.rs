//! Hour rollups for reporting: per employee, per location, and the
//! theoretical monthly capacity a location's weekday table implies.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::calendar::{days_in_month, weekday0};
use crate::config::FallbackRule;
use crate::roster::LocationProfile;
use crate::types::{Assignment, AssignmentKind, EmployeeId, LocationId};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct EmployeeHours {
    pub store_hours:   u32,
    pub office_hours:  u32,
    pub on_call_hours: u32,
    pub day_off_count: u32,
    pub total:         u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct LocationHours {
    pub assigned_hours: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HoursReport {
    pub per_employee: BTreeMap<EmployeeId, EmployeeHours>,
    pub per_location: BTreeMap<LocationId, LocationHours>,
}

/// Roll up one assignment set. Office and on-call hours are classified
/// by the configured fallback location ids; everything else counts as
/// store hours.
pub fn aggregate(assignments: &[Assignment], fallback: &FallbackRule) -> HoursReport {
    let mut report = HoursReport::default();

    for assignment in assignments {
        let employee = report
            .per_employee
            .entry(assignment.employee_id.clone())
            .or_default();

        match assignment.kind {
            AssignmentKind::DayOff => {
                employee.day_off_count += 1;
                continue;
            }
            AssignmentKind::Store => {}
        }

        let hours = u32::from(assignment.hours);
        employee.total += hours;
        match &assignment.location_id {
            Some(id) if *id == fallback.office_location => employee.office_hours += hours,
            Some(id) if *id == fallback.on_call_location => employee.on_call_hours += hours,
            _ => employee.store_hours += hours,
        }

        if let Some(location_id) = &assignment.location_id {
            report
                .per_location
                .entry(location_id.clone())
                .or_default()
                .assigned_hours += hours;
        }
    }

    report
}

/// A location's theoretical hour total for the month: its per-weekday
/// table summed over every calendar day, independent of assignments.
pub fn theoretical_month_hours(location: &LocationProfile, month0: u32, year: i32) -> u32 {
    let mut total = 0u32;
    for day in 1..=days_in_month(year, month0) {
        let Some(date) = NaiveDate::from_ymd_opt(year, month0 + 1, day) else {
            continue;
        };
        total += u32::from(location.weekday_hours.hours_on(weekday0(date)));
    }
    total
}

/// Assigned / theoretical. A location with no theoretical hours has
/// coverage 0 rather than a division error.
pub fn coverage_ratio(assigned_hours: u32, theoretical_hours: u32) -> f64 {
    if theoretical_hours == 0 {
        0.0
    } else {
        f64::from(assigned_hours) / f64::from(theoretical_hours)
    }
}
