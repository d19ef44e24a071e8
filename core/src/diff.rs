//! Revision differencing — added/updated/removed between two committed
//! assignment sets.
//!
//! RULE: entries are matched by map lookup on the typed key
//! (employee id, date), never by array position. Location and hours are
//! payload, not key. The diff feeds notification summaries only; it is
//! never the source of truth for persisted state.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::types::{Assignment, EmployeeId};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AssignmentChange {
    pub previous: Assignment,
    pub next:     Assignment,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RevisionDiff {
    pub added:   Vec<Assignment>,
    pub removed: Vec<Assignment>,
    pub updated: Vec<AssignmentChange>,
}

impl RevisionDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }

    /// Every employee with at least one change, in stable order.
    pub fn touched_employees(&self) -> BTreeSet<EmployeeId> {
        let mut touched = BTreeSet::new();
        for a in &self.added {
            touched.insert(a.employee_id.clone());
        }
        for r in &self.removed {
            touched.insert(r.employee_id.clone());
        }
        for u in &self.updated {
            touched.insert(u.next.employee_id.clone());
        }
        touched
    }
}

/// Compare two committed sets. Identical entries are omitted; an entry
/// present on both sides with a different location or hours becomes an
/// update carrying both versions.
pub fn diff(previous: &[Assignment], next: &[Assignment]) -> RevisionDiff {
    let previous_by_key: HashMap<(&str, NaiveDate), &Assignment> = previous
        .iter()
        .map(|a| ((a.employee_id.as_str(), a.date), a))
        .collect();
    let next_by_key: HashMap<(&str, NaiveDate), &Assignment> = next
        .iter()
        .map(|a| ((a.employee_id.as_str(), a.date), a))
        .collect();

    let mut out = RevisionDiff::default();

    for entry in next {
        match previous_by_key.get(&(entry.employee_id.as_str(), entry.date)) {
            None => out.added.push(entry.clone()),
            Some(prior) => {
                if prior.location_id != entry.location_id || prior.hours != entry.hours {
                    out.updated.push(AssignmentChange {
                        previous: (*prior).clone(),
                        next: entry.clone(),
                    });
                }
            }
        }
    }

    for entry in previous {
        if !next_by_key.contains_key(&(entry.employee_id.as_str(), entry.date)) {
            out.removed.push(entry.clone());
        }
    }

    out
}
