//! Primary-phase generation tests against the January 2024 calendar
//! (31 days, Sundays on the 7th, 14th, 21st and 28th).

use chrono::{Datelike, NaiveDate};
use shiftdesk_core::{
    calendar::{weekday0, SUNDAY},
    config::ScheduleConfig,
    generator::generate,
    roster::{DayOffCalendar, EmployeeRecord, LocationRecord, RosterIndex, WeekdayHours},
    types::AssignmentKind,
};

fn ann() -> EmployeeRecord {
    EmployeeRecord { id: "e-ann".into(), display_name: "Ann".into(), is_active: true }
}

fn north() -> LocationRecord {
    LocationRecord {
        id: "l-north".into(),
        name: "North Store".into(),
        weekday_hours: WeekdayHours { mon: 8, tue: 8, wed: 8, thu: 8, fri: 8, sat: 6, sun: 0 },
        is_active: true,
    }
}

fn roster_for(
    employees: &[EmployeeRecord],
    locations: &[LocationRecord],
) -> RosterIndex {
    RosterIndex::build(employees, locations, &ScheduleConfig::default_test())
}

#[test]
fn full_month_without_day_offs_yields_27_assignments() {
    let roster = roster_for(&[ann()], &[north()]);
    let set = generate(&roster, &DayOffCalendar::new(), 0, 2024);

    assert_eq!(set.len(), 27, "expected 27 working days in January 2024");
    for a in &set {
        assert_eq!(a.employee_id, "e-ann");
        assert_eq!(a.location_id.as_deref(), Some("l-north"));
        if a.date.weekday().num_days_from_sunday() == 6 {
            assert_eq!(a.hours, 6, "Saturday {} should use the Saturday hours", a.date);
        } else {
            assert_eq!(a.hours, 8, "{} should use the weekday hours", a.date);
        }
    }

    let saturdays: Vec<u32> = set.iter().filter(|a| a.hours == 6).map(|a| a.date.day()).collect();
    assert_eq!(saturdays, vec![6, 13, 20, 27]);
}

#[test]
fn sundays_never_receive_store_assignments() {
    let roster = roster_for(&[ann()], &[north()]);
    let set = generate(&roster, &DayOffCalendar::new(), 0, 2024);

    for a in &set {
        assert_ne!(weekday0(a.date), SUNDAY, "generated an entry on Sunday {}", a.date);
    }
}

#[test]
fn day_off_produces_a_marker_and_no_working_hours() {
    let off_day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    let mut day_offs = DayOffCalendar::new();
    day_offs.add("e-ann", off_day);

    let roster = roster_for(&[ann()], &[north()]);
    let set = generate(&roster, &day_offs, 0, 2024);

    let on_day: Vec<_> = set.iter().filter(|a| a.date == off_day).collect();
    assert_eq!(on_day.len(), 1);
    assert_eq!(on_day[0].kind, AssignmentKind::DayOff);
    assert_eq!(on_day[0].hours, 0);
    assert_eq!(on_day[0].location_id, None);

    // 26 working entries plus the marker.
    assert_eq!(set.len(), 27);
    assert_eq!(set.iter().filter(|a| a.hours > 0).count(), 26);
}

#[test]
fn zero_hour_weekdays_are_never_assigned() {
    let mut closed_saturdays = north();
    closed_saturdays.weekday_hours.sat = 0;

    let roster = roster_for(&[ann()], &[closed_saturdays]);
    let set = generate(&roster, &DayOffCalendar::new(), 0, 2024);

    // 27 working days minus 4 Saturdays.
    assert_eq!(set.len(), 23);
    assert!(set.iter().all(|a| a.hours > 0));
}

#[test]
fn no_employee_works_twice_on_one_date() {
    let employees = vec![
        ann(),
        EmployeeRecord { id: "e-bob".into(), display_name: "Bob".into(), is_active: true },
        EmployeeRecord { id: "e-flo".into(), display_name: "Flo".into(), is_active: true },
    ];
    let locations = vec![
        north(),
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
    ];
    let mut day_offs = DayOffCalendar::new();
    day_offs.add("e-ann", NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    day_offs.add("e-bob", NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());

    let roster = roster_for(&employees, &locations);
    let set = generate(&roster, &day_offs, 0, 2024);

    let mut seen = std::collections::HashSet::new();
    for a in set.iter().filter(|a| a.hours > 0) {
        assert!(
            seen.insert((a.employee_id.clone(), a.date)),
            "{} works twice on {}",
            a.employee_id,
            a.date
        );
    }
}
