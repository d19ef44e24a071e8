//! THE MOST IMPORTANT TEST IN THE PROJECT.
//!
//! Two runs, same employees, same locations, same day-off preferences.
//! They must produce identical assignment sets, entry for entry.
//! Any divergence is a blocker — do not merge until fixed.

use chrono::NaiveDate;
use shiftdesk_core::{
    config::ScheduleConfig,
    generator::generate,
    roster::{DayOffCalendar, EmployeeRecord, LocationRecord, RosterIndex, WeekdayHours},
};

fn sample_employees() -> Vec<EmployeeRecord> {
    vec![
        EmployeeRecord { id: "e-ann".into(), display_name: "Ann".into(), is_active: true },
        EmployeeRecord { id: "e-bob".into(), display_name: "Bob".into(), is_active: true },
        EmployeeRecord { id: "e-flo".into(), display_name: "Flo".into(), is_active: true },
    ]
}

fn sample_locations() -> Vec<LocationRecord> {
    let weekdays = WeekdayHours { mon: 8, tue: 8, wed: 8, thu: 8, fri: 8, sat: 6, sun: 0 };
    vec![
        LocationRecord { id: "l-north".into(), name: "North Store".into(), weekday_hours: weekdays, is_active: true },
        LocationRecord {
            id: "l-south".into(),
            name: "South Store".into(),
            weekday_hours: WeekdayHours { mon: 8, tue: 8, wed: 8, thu: 8, fri: 8, sat: 4, sun: 0 },
            is_active: true,
        },
        LocationRecord {
            id: "l-office".into(),
            name: "Head Office".into(),
            weekday_hours: WeekdayHours { mon: 8, tue: 8, wed: 8, thu: 8, fri: 8, sat: 0, sun: 0 },
            is_active: true,
        },
        LocationRecord {
            id: "l-oncall".into(),
            name: "On-Call Desk".into(),
            weekday_hours: WeekdayHours { mon: 0, tue: 0, wed: 0, thu: 0, fri: 0, sat: 8, sun: 0 },
            is_active: true,
        },
    ]
}

fn sample_day_offs() -> DayOffCalendar {
    let mut day_offs = DayOffCalendar::new();
    day_offs.add("e-ann", NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    day_offs.add("e-bob", NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    day_offs.add("e-flo", NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    day_offs
}

#[test]
fn identical_inputs_produce_identical_assignment_sets() {
    let config = ScheduleConfig::default_test();
    let employees = sample_employees();
    let locations = sample_locations();
    let day_offs = sample_day_offs();

    let roster_a = RosterIndex::build(&employees, &locations, &config);
    let roster_b = RosterIndex::build(&employees, &locations, &config);

    let set_a = generate(&roster_a, &day_offs, 0, 2024);
    let set_b = generate(&roster_b, &day_offs, 0, 2024);

    assert_eq!(
        set_a.len(), set_b.len(),
        "Assignment set lengths differ: {} vs {}",
        set_a.len(), set_b.len()
    );

    for (i, (a, b)) in set_a.iter().zip(set_b.iter()).enumerate() {
        assert_eq!(a, b, "Assignment sets diverged at entry {i}:\n  A: {a:?}\n  B: {b:?}");
    }
}

#[test]
fn record_order_does_not_change_the_output() {
    let config = ScheduleConfig::default_test();
    let day_offs = sample_day_offs();

    let mut employees_reversed = sample_employees();
    employees_reversed.reverse();
    let mut locations_reversed = sample_locations();
    locations_reversed.reverse();

    let roster_a = RosterIndex::build(&sample_employees(), &sample_locations(), &config);
    let roster_b = RosterIndex::build(&employees_reversed, &locations_reversed, &config);

    let set_a = generate(&roster_a, &day_offs, 0, 2024);
    let set_b = generate(&roster_b, &day_offs, 0, 2024);
    assert_eq!(set_a, set_b, "input record order leaked into the output");
}

#[test]
fn regenerating_the_same_month_yields_an_empty_diff() {
    let mut engine = shiftdesk_core::engine::ScheduleEngine::build_test().unwrap();
    let employees = sample_employees();
    let locations = sample_locations();
    let day_offs = sample_day_offs();

    let first = engine
        .generate_month(&employees, &locations, &day_offs, 0, 2024)
        .unwrap();
    assert!(!first.assignments.is_empty());

    let second = engine
        .generate_month(&employees, &locations, &day_offs, 0, 2024)
        .unwrap();
    assert!(
        second.diff.is_empty(),
        "second identical run reported changes: {:?}",
        second.diff
    );
}
