//! Roster directory — resolves raw employee/location records into
//! business-rule profiles.
//!
//! RULES:
//!   - Resolution happens once, before generation; the generator only
//!     ever sees resolved profiles.
//!   - An unrecognized employee is an `Unmapped` variant, not an error
//!     and not silent empty behavior. The caller picks the policy;
//!     `RosterIndex::build` skips them with a warning.
//!   - All generator-facing collections iterate in ascending id order
//!     so a run is reproducible input-for-input.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::config::{FallbackRule, ScheduleConfig, DEFAULT_OPEN_HOURS};
use crate::types::{EmployeeId, GroupId, LocationId};

// ── Raw records ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id:           EmployeeId,
    pub display_name: String,
    pub is_active:    bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id:            LocationId,
    pub name:          String,
    pub weekday_hours: WeekdayHours,
    pub is_active:     bool,
}

/// Open hours per weekday, 0–24 each. Sunday is expected to be 0.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeekdayHours {
    pub mon: u8,
    pub tue: u8,
    pub wed: u8,
    pub thu: u8,
    pub fri: u8,
    pub sat: u8,
    pub sun: u8,
}

impl WeekdayHours {
    /// Hours for a weekday (0 = Sunday .. 6 = Saturday).
    ///
    /// An entry above 24 is a data-entry mistake; it falls back to
    /// `DEFAULT_OPEN_HOURS` with a warning instead of failing the run.
    pub fn hours_on(&self, weekday: u32) -> u8 {
        let raw = match weekday {
            0 => self.sun,
            1 => self.mon,
            2 => self.tue,
            3 => self.wed,
            4 => self.thu,
            5 => self.fri,
            6 => self.sat,
            _ => 0,
        };
        if raw > 24 {
            log::warn!("weekday {weekday} has {raw} configured hours, using default {DEFAULT_OPEN_HOURS}");
            DEFAULT_OPEN_HOURS
        } else {
            raw
        }
    }
}

// ── Resolved profiles ─────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeProfile {
    pub id:             EmployeeId,
    pub display_name:   String,
    pub main_location:  Option<LocationId>,
    pub substitute_for: Vec<GroupId>,
    pub is_floating:    bool,
}

/// Resolution outcome. Unmapped employees have no capability rule;
/// whoever resolves them must decide what to do with them.
#[derive(Debug, Clone)]
pub enum ResolvedEmployee {
    Resolved(EmployeeProfile),
    Unmapped {
        id:           EmployeeId,
        display_name: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationProfile {
    pub id:            LocationId,
    pub name:          String,
    pub code:          String,
    pub weekday_hours: WeekdayHours,
}

/// Resolve one employee record against the capability rules.
pub fn resolve_employee(record: &EmployeeRecord, config: &ScheduleConfig) -> ResolvedEmployee {
    match config.capabilities.get(&record.id) {
        Some(rule) => ResolvedEmployee::Resolved(EmployeeProfile {
            id: record.id.clone(),
            display_name: record.display_name.clone(),
            main_location: rule.main_location.clone(),
            substitute_for: rule.substitute_for.clone(),
            is_floating: rule.is_floating,
        }),
        None => ResolvedEmployee::Unmapped {
            id: record.id.clone(),
            display_name: record.display_name.clone(),
        },
    }
}

/// Resolve one location record. Exact name lookup into the code table;
/// unknown names get a synthetic code from the first three letters of
/// the name, uppercased.
pub fn resolve_location(record: &LocationRecord, config: &ScheduleConfig) -> LocationProfile {
    let code = match config.location_codes.get(&record.name) {
        Some(code) => code.clone(),
        None => record
            .name
            .chars()
            .filter(|c| c.is_alphabetic())
            .take(3)
            .collect::<String>()
            .to_uppercase(),
    };
    LocationProfile {
        id: record.id.clone(),
        name: record.name.clone(),
        code,
        weekday_hours: record.weekday_hours,
    }
}

// ── Day-off preferences ───────────────────────────────────────

/// Employee → set of calendar dates. Proper date values throughout;
/// string-keyed date maps drift formats and are banned here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayOffCalendar {
    days_off: HashMap<EmployeeId, BTreeSet<NaiveDate>>,
}

impl DayOffCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, employee_id: &str, date: NaiveDate) {
        self.days_off
            .entry(employee_id.to_string())
            .or_default()
            .insert(date);
    }

    pub fn is_off(&self, employee_id: &str, date: NaiveDate) -> bool {
        self.days_off
            .get(employee_id)
            .is_some_and(|dates| dates.contains(&date))
    }
}

// ── Generator-facing index ────────────────────────────────────

/// Everything the generator needs, resolved once and ordered.
#[derive(Debug, Clone)]
pub struct RosterIndex {
    /// Resolved profiles, ascending employee id.
    pub profiles: Vec<EmployeeProfile>,
    /// Resolved active locations, ascending location id.
    pub locations: Vec<LocationProfile>,
    /// Reverse index: location → its main assignee.
    pub main_assignee: BTreeMap<LocationId, EmployeeId>,
    /// Substitution group → designated substitute.
    pub substitutes: BTreeMap<GroupId, EmployeeId>,
    /// Location → its substitution group.
    pub group_of: BTreeMap<LocationId, GroupId>,
    /// The floating employee, if the roster has one.
    pub floating: Option<EmployeeId>,
    pub fallback: FallbackRule,
}

impl RosterIndex {
    /// Build the index from raw records. Inactive records are dropped,
    /// unmapped employees are skipped with a warning.
    pub fn build(
        employees: &[EmployeeRecord],
        locations: &[LocationRecord],
        config: &ScheduleConfig,
    ) -> Self {
        let mut profiles: Vec<EmployeeProfile> = Vec::new();
        for record in employees.iter().filter(|e| e.is_active) {
            match resolve_employee(record, config) {
                ResolvedEmployee::Resolved(profile) => profiles.push(profile),
                ResolvedEmployee::Unmapped { id, display_name } => {
                    log::warn!("employee {id} ({display_name}) has no capability rule, skipping");
                }
            }
        }
        profiles.sort_by(|a, b| a.id.cmp(&b.id));

        let mut resolved_locations: Vec<LocationProfile> = locations
            .iter()
            .filter(|l| l.is_active)
            .map(|l| resolve_location(l, config))
            .collect();
        resolved_locations.sort_by(|a, b| a.id.cmp(&b.id));

        // Reverse index. Two employees claiming the same main location is
        // a misconfiguration; profiles are id-sorted, so the smallest
        // employee id wins the slot and record order never matters.
        let mut main_assignee: BTreeMap<LocationId, EmployeeId> = BTreeMap::new();
        for profile in &profiles {
            let Some(location_id) = &profile.main_location else {
                continue;
            };
            if let Some(existing) = main_assignee.get(location_id) {
                log::warn!(
                    "location {location_id} has two main assignees ({existing}, {}), keeping {existing}",
                    profile.id
                );
            } else {
                main_assignee.insert(location_id.clone(), profile.id.clone());
            }
        }

        let mut substitutes: BTreeMap<GroupId, EmployeeId> = BTreeMap::new();
        let mut group_of: BTreeMap<LocationId, GroupId> = BTreeMap::new();
        for group in &config.groups {
            // A substitute who is not on the active roster can never be
            // assigned; the group keeps its locations but stays uncovered.
            if profiles.iter().any(|p| p.id == group.substitute) {
                substitutes.insert(group.group_id.clone(), group.substitute.clone());
            } else {
                log::warn!(
                    "group {} names substitute {} who is not on the roster",
                    group.group_id, group.substitute
                );
            }
            for location_id in &group.locations {
                group_of.insert(location_id.clone(), group.group_id.clone());
            }
        }

        // Profiles are already id-sorted, so with several floating
        // employees the smallest id wins here too.
        let mut floating: Option<EmployeeId> = None;
        for profile in profiles.iter().filter(|p| p.is_floating) {
            if let Some(existing) = &floating {
                log::warn!("multiple floating employees ({existing}, {}), keeping {existing}", profile.id);
            } else {
                floating = Some(profile.id.clone());
            }
        }

        Self {
            profiles,
            locations: resolved_locations,
            main_assignee,
            substitutes,
            group_of,
            floating,
            fallback: config.fallback.clone(),
        }
    }

    pub fn location(&self, id: &str) -> Option<&LocationProfile> {
        self.locations.iter().find(|l| l.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn north() -> LocationRecord {
        LocationRecord {
            id: "l-north".into(),
            name: "North Store".into(),
            weekday_hours: WeekdayHours {
                mon: 8, tue: 8, wed: 8, thu: 8, fri: 8, sat: 6, sun: 0,
            },
            is_active: true,
        }
    }

    #[test]
    fn known_location_name_gets_canonical_code() {
        let config = ScheduleConfig::default_test();
        let profile = resolve_location(&north(), &config);
        assert_eq!(profile.code, "NRT");
    }

    #[test]
    fn unknown_location_name_gets_synthetic_code() {
        let config = ScheduleConfig::default_test();
        let mut record = north();
        record.name = "Riverside Kiosk".into();
        let profile = resolve_location(&record, &config);
        assert_eq!(profile.code, "RIV");
    }

    #[test]
    fn unmapped_employee_is_a_variant_not_an_error() {
        let config = ScheduleConfig::default_test();
        let record = EmployeeRecord {
            id: "e-nobody".into(),
            display_name: "New Hire".into(),
            is_active: true,
        };
        match resolve_employee(&record, &config) {
            ResolvedEmployee::Unmapped { id, .. } => assert_eq!(id, "e-nobody"),
            ResolvedEmployee::Resolved(_) => panic!("should not resolve"),
        }
    }

    #[test]
    fn malformed_hours_entry_falls_back_to_default() {
        let hours = WeekdayHours { mon: 99, ..WeekdayHours::default() };
        assert_eq!(hours.hours_on(1), DEFAULT_OPEN_HOURS);
        assert_eq!(hours.hours_on(2), 0);
    }

    #[test]
    fn duplicate_main_location_keeps_smallest_employee_id() {
        let mut config = ScheduleConfig::default_test();
        // Misconfigure: e-bob also claims l-north.
        config.capabilities.get_mut("e-bob").unwrap().main_location = Some("l-north".into());

        let employees = vec![
            EmployeeRecord { id: "e-bob".into(), display_name: "Bob".into(), is_active: true },
            EmployeeRecord { id: "e-ann".into(), display_name: "Ann".into(), is_active: true },
        ];
        let index = RosterIndex::build(&employees, &[north()], &config);
        assert_eq!(index.main_assignee.get("l-north"), Some(&"e-ann".to_string()));
    }
}
