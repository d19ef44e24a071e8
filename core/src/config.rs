//! Scheduling rule configuration.
//!
//! RULE: capability tags are explicit configuration, resolved once at
//! load time. Nothing in the engine infers an employee's duties from
//! free-text display names at runtime.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{EmployeeId, GroupId, LocationId};

/// Fallback applied when a per-weekday hours entry is malformed (> 24).
/// Lenient on purpose; the warning log keeps data-entry mistakes visible.
pub const DEFAULT_OPEN_HOURS: u8 = 8;

/// Per-employee scheduling duties, keyed by employee id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityRule {
    pub employee_id: EmployeeId,
    /// The single location this employee staffs on a normal working day.
    #[serde(default)]
    pub main_location: Option<LocationId>,
    /// Substitution groups this employee covers as designated substitute.
    #[serde(default)]
    pub substitute_for: Vec<GroupId>,
    /// Floating role: no main location, substitution plus fixed fallback duty.
    #[serde(default)]
    pub is_floating: bool,
}

/// A static, disjoint partition of locations with one designated
/// substitute per group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstitutionGroup {
    pub group_id:   GroupId,
    pub locations:  Vec<LocationId>,
    pub substitute: EmployeeId,
}

/// Fixed fallback duty for the floating employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackRule {
    /// Assigned on every working day except Saturday.
    pub office_location: LocationId,
    /// Assigned on Saturdays.
    pub on_call_location: LocationId,
    pub hours: u8,
}

#[derive(Debug, Clone, Deserialize)]
struct CapabilitiesFile {
    capabilities: Vec<CapabilityRule>,
}

#[derive(Debug, Clone, Deserialize)]
struct GroupsFile {
    groups: Vec<SubstitutionGroup>,
}

#[derive(Debug, Clone, Deserialize)]
struct LocationCodeEntry {
    name: String,
    code: String,
}

#[derive(Debug, Clone, Deserialize)]
struct LocationCodesFile {
    codes: Vec<LocationCodeEntry>,
}

#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    pub capabilities:   HashMap<EmployeeId, CapabilityRule>,
    pub groups:         Vec<SubstitutionGroup>,
    /// Exact location name → canonical code.
    pub location_codes: HashMap<String, String>,
    pub fallback:       FallbackRule,
}

impl ScheduleConfig {
    /// Load from the data/ directory.
    /// In tests, use ScheduleConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let cap_path = format!("{data_dir}/roster/capabilities.json");
        let cap_content = std::fs::read_to_string(&cap_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {cap_path}: {e}"))?;
        let cap_file: CapabilitiesFile = serde_json::from_str(&cap_content)?;
        let capabilities = cap_file
            .capabilities
            .into_iter()
            .map(|c| (c.employee_id.clone(), c))
            .collect();

        let group_path = format!("{data_dir}/roster/substitution_groups.json");
        let group_content = std::fs::read_to_string(&group_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {group_path}: {e}"))?;
        let group_file: GroupsFile = serde_json::from_str(&group_content)?;

        let fallback_path = format!("{data_dir}/roster/fallback.json");
        let fallback_content = std::fs::read_to_string(&fallback_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {fallback_path}: {e}"))?;
        let fallback: FallbackRule = serde_json::from_str(&fallback_content)?;

        let codes_path = format!("{data_dir}/locations/location_codes.json");
        let codes_content = std::fs::read_to_string(&codes_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {codes_path}: {e}"))?;
        let codes_file: LocationCodesFile = serde_json::from_str(&codes_content)?;
        let location_codes = codes_file
            .codes
            .into_iter()
            .map(|c| (c.name, c.code))
            .collect();

        Ok(Self {
            capabilities,
            groups: group_file.groups,
            location_codes,
            fallback,
        })
    }

    /// Config with hardcoded defaults for use in unit tests.
    ///
    /// Two store employees, one floating substitute covering both
    /// stores, an office and an on-call desk for the fallback duty.
    pub fn default_test() -> Self {
        let capabilities = [
            (
                "e-ann".into(),
                CapabilityRule {
                    employee_id: "e-ann".into(),
                    main_location: Some("l-north".into()),
                    substitute_for: vec![],
                    is_floating: false,
                },
            ),
            (
                "e-bob".into(),
                CapabilityRule {
                    employee_id: "e-bob".into(),
                    main_location: Some("l-south".into()),
                    substitute_for: vec![],
                    is_floating: false,
                },
            ),
            (
                "e-flo".into(),
                CapabilityRule {
                    employee_id: "e-flo".into(),
                    main_location: None,
                    substitute_for: vec!["g-stores".into()],
                    is_floating: true,
                },
            ),
        ]
        .into();

        Self {
            capabilities,
            groups: vec![SubstitutionGroup {
                group_id: "g-stores".into(),
                locations: vec!["l-north".into(), "l-south".into()],
                substitute: "e-flo".into(),
            }],
            location_codes: [
                ("North Store".into(), "NRT".into()),
                ("South Store".into(), "STH".into()),
                ("Head Office".into(), "OFF".into()),
                ("On-Call Desk".into(), "ONC".into()),
            ]
            .into(),
            fallback: FallbackRule {
                office_location: "l-office".into(),
                on_call_location: "l-oncall".into(),
                hours: 8,
            },
        }
    }
}
