//! Notification dispatch — the boundary to whatever delivers messages.
//!
//! RULES:
//!   - Dispatch happens strictly after a successful commit.
//!   - Failures are isolated per recipient: logged, counted, and never
//!     allowed to look like a generation or commit failure.

use std::fmt::Write as _;

use crate::diff::RevisionDiff;
use crate::types::Assignment;

/// The delivery contract. The chat-bot transport lives behind this.
pub trait Notifier {
    fn deliver(&self, employee_id: &str, summary: &str) -> anyhow::Result<()>;
}

/// Writes every summary to the log. Default transport for the runner
/// and for tests.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn deliver(&self, employee_id: &str, summary: &str) -> anyhow::Result<()> {
        log::info!("notify {employee_id}:\n{summary}");
        Ok(())
    }
}

fn describe(a: &Assignment) -> String {
    match &a.location_id {
        Some(location) => format!("{} at {location} ({}h)", a.date, a.hours),
        None => format!("{} day off", a.date),
    }
}

/// Human-readable change summary for one employee.
pub fn summarize_for(diff: &RevisionDiff, employee_id: &str) -> String {
    let mut summary = String::new();
    for a in diff.added.iter().filter(|a| a.employee_id == employee_id) {
        let _ = writeln!(summary, "+ {}", describe(a));
    }
    for u in diff.updated.iter().filter(|u| u.next.employee_id == employee_id) {
        let _ = writeln!(summary, "~ {} -> {}", describe(&u.previous), describe(&u.next));
    }
    for r in diff.removed.iter().filter(|r| r.employee_id == employee_id) {
        let _ = writeln!(summary, "- {}", describe(r));
    }
    summary
}

/// Deliver one summary per affected employee. Returns how many went
/// through; the rest are logged and skipped.
pub fn dispatch(diff: &RevisionDiff, notifier: &dyn Notifier) -> usize {
    let mut delivered = 0usize;
    for employee_id in diff.touched_employees() {
        let summary = summarize_for(diff, &employee_id);
        match notifier.deliver(&employee_id, &summary) {
            Ok(()) => delivered += 1,
            Err(e) => log::warn!("notification to {employee_id} failed: {e}"),
        }
    }
    delivered
}
