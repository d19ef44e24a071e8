//! plan-runner: headless schedule runner for shiftdesk.
//!
//! Usage:
//!   plan-runner --data-dir ./data --month 1 --year 2024
//!   plan-runner --data-dir ./data --month 1 --year 2024 --db plans.db --notify

use anyhow::Result;
use shiftdesk_core::{
    config::ScheduleConfig,
    engine::ScheduleEngine,
    hours::{aggregate, coverage_ratio, theoretical_month_hours},
    notify::LogNotifier,
    roster::{resolve_location, DayOffCalendar, EmployeeRecord, LocationRecord},
    store::ScheduleStore,
};
use std::env;

#[derive(serde::Deserialize)]
struct EmployeesFile {
    employees: Vec<EmployeeRecord>,
}

#[derive(serde::Deserialize)]
struct LocationsFile {
    locations: Vec<LocationRecord>,
}

#[derive(serde::Deserialize)]
struct DayOffEntry {
    employee_id: String,
    dates:       Vec<chrono::NaiveDate>,
}

#[derive(serde::Deserialize)]
struct DayOffsFile {
    day_offs: Vec<DayOffEntry>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let month = parse_arg(&args, "--month", 1u32); // calendar month, 1..12
    let year = parse_arg(&args, "--year", 2024i32);
    let notify = args.iter().any(|a| a == "--notify");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");

    if month < 1 || month > 12 {
        anyhow::bail!("--month must be 1..12, got {month}");
    }
    let month0 = month - 1;

    println!("shiftdesk — plan-runner");
    println!("  month:     {month}/{year}");
    println!("  db:        {db}");
    println!("  data_dir:  {data_dir}");
    println!();

    let config = ScheduleConfig::load(data_dir)?;
    let (employees, locations, day_offs) = load_records(data_dir)?;

    let store = if db == ":memory:" {
        ScheduleStore::in_memory()?
    } else {
        ScheduleStore::open(db)?
    };
    store.migrate()?;

    let mut engine = ScheduleEngine::new(config, store);
    let outcome = engine.generate_month(&employees, &locations, &day_offs, month0, year)?;

    if notify {
        engine.mark_ready(month0, year)?;
        let delivered = engine.notify_changes(month0, year, &outcome.diff, &LogNotifier)?;
        println!("notified {delivered} employees");
        println!();
    }

    print_summary(&engine, &outcome.assignments, &locations, month0, year);
    println!();
    println!(
        "diff vs previous revision: {} added, {} updated, {} removed",
        outcome.diff.added.len(),
        outcome.diff.updated.len(),
        outcome.diff.removed.len(),
    );
    Ok(())
}

fn load_records(
    data_dir: &str,
) -> Result<(Vec<EmployeeRecord>, Vec<LocationRecord>, DayOffCalendar)> {
    let employees: EmployeesFile = read_json(&format!("{data_dir}/records/employees.json"))?;
    let locations: LocationsFile = read_json(&format!("{data_dir}/records/locations.json"))?;
    let day_offs_file: DayOffsFile = read_json(&format!("{data_dir}/records/day_offs.json"))?;

    let mut day_offs = DayOffCalendar::new();
    for entry in day_offs_file.day_offs {
        for date in entry.dates {
            day_offs.add(&entry.employee_id, date);
        }
    }
    Ok((employees.employees, locations.locations, day_offs))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
    let content =
        std::fs::read_to_string(path).map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
    Ok(serde_json::from_str(&content)?)
}

fn print_summary(
    engine: &ScheduleEngine,
    assignments: &[shiftdesk_core::types::Assignment],
    locations: &[LocationRecord],
    month0: u32,
    year: i32,
) {
    let report = aggregate(assignments, &engine.config.fallback);

    println!("=== RUN SUMMARY ===");
    println!("  assignments: {}", assignments.len());
    println!();
    println!("  per employee (store/office/on-call/total, days off):");
    for (employee_id, hours) in &report.per_employee {
        println!(
            "    {employee_id:<12} {:>4} {:>4} {:>4} {:>5}   {:>2}",
            hours.store_hours,
            hours.office_hours,
            hours.on_call_hours,
            hours.total,
            hours.day_off_count,
        );
    }

    println!();
    println!("  per location (assigned / theoretical, coverage):");
    for record in locations.iter().filter(|l| l.is_active) {
        let profile = resolve_location(record, &engine.config);
        let assigned = report
            .per_location
            .get(&profile.id)
            .map(|l| l.assigned_hours)
            .unwrap_or(0);
        let theoretical = theoretical_month_hours(&profile, month0, year);
        println!(
            "    {:<12} [{}] {assigned:>4} / {theoretical:>4}   {:>5.1}%",
            profile.id,
            profile.code,
            coverage_ratio(assigned, theoretical) * 100.0,
        );
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
