//! Audit trail of user actions.
//!
//! Kept in memory only. Nothing here survives a restart.

use std::sync::RwLock;

use serde::Serialize;
use serde_json::json;
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tracing::info;

use crate::{LOG_TARGET, Role};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: String,
    pub timestamp: String,
    pub user_id: String,
    /// Role label, e.g. `Teacher`
    pub role: String,
    pub action: String,
    pub details: serde_json::Value,
}

/// Search and role filter of the audit log viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFilter {
    search: String,
    role: Option<String>,
}

impl AuditFilter {
    /// `role` of `all` (or empty) matches any role. `search` is matched as
    /// typed, surrounding whitespace included.
    pub fn from_query(search: Option<&str>, role: Option<&str>) -> Self {
        Self {
            search: search.unwrap_or_default().to_lowercase(),
            role: role
                .map(str::trim)
                .filter(|r| !r.is_empty() && *r != "all")
                .map(ToOwned::to_owned),
        }
    }

    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        let matches_search = [&entry.action, &entry.user_id, &entry.id]
            .iter()
            .any(|field| field.to_lowercase().contains(&self.search));
        let matches_role = self.role.as_ref().is_none_or(|r| *r == entry.role);
        matches_search && matches_role
    }
}

pub struct AuditTrail {
    entries: RwLock<Vec<AuditLogEntry>>,
}

impl AuditTrail {
    pub fn empty() -> Self {
        Self {
            entries: RwLock::new(vec![]),
        }
    }

    /// Trail pre-populated with the demo entries.
    pub fn seeded() -> Self {
        Self {
            entries: RwLock::new(fixture_entries()),
        }
    }

    pub fn record(
        &self,
        user_id: &str,
        role: Role,
        action: impl Into<String>,
        details: serde_json::Value,
        at: OffsetDateTime,
    ) -> AuditLogEntry {
        let mut entries = self.entries.write().expect("Locking failed");
        let entry = AuditLogEntry {
            id: format!("log_{:03}", entries.len() + 1),
            timestamp: at.format(TIMESTAMP_FORMAT).expect("Can't fail"),
            user_id: user_id.to_owned(),
            role: role.label().to_owned(),
            action: action.into(),
            details,
        };
        info!(
            target: LOG_TARGET,
            id = %entry.id,
            user_id = %entry.user_id,
            action = %entry.action,
            "Audit entry recorded"
        );
        entries.push(entry.clone());
        entry
    }

    pub fn record_now(
        &self,
        user_id: &str,
        role: Role,
        action: impl Into<String>,
        details: serde_json::Value,
    ) -> AuditLogEntry {
        self.record(user_id, role, action, details, OffsetDateTime::now_utc())
    }

    /// Matching entries, oldest first.
    pub fn filtered(&self, filter: &AuditFilter) -> Vec<AuditLogEntry> {
        self.entries
            .read()
            .expect("Locking failed")
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect()
    }

    /// Up to `limit` entries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<AuditLogEntry> {
        self.entries
            .read()
            .expect("Locking failed")
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("Locking failed").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn fixture_entries() -> Vec<AuditLogEntry> {
    let entry = |id: &str, timestamp: &str, user_id: &str, role: &str, action: &str, details| {
        AuditLogEntry {
            id: id.to_owned(),
            timestamp: timestamp.to_owned(),
            user_id: user_id.to_owned(),
            role: role.to_owned(),
            action: action.to_owned(),
            details,
        }
    };

    vec![
        entry(
            "log_001",
            "2025-06-21 09:30:00",
            "teacher_123",
            "Teacher",
            "Accessed Student Drill-Down for STU-4567",
            json!({ "studentId": "STU-4567", "view": "Student Drill-Down" }),
        ),
        entry(
            "log_002",
            "2025-06-21 10:15:30",
            "admin_001",
            "Administrator",
            "Modified Override Panel: Hint Strictness to 70%",
            json!({
                "panel": "Override Panel",
                "setting": "Hint Strictness",
                "oldValue": "50%",
                "newValue": "70%",
            }),
        ),
        entry(
            "log_003",
            "2025-06-21 11:00:10",
            "teacher_123",
            "Teacher",
            "Viewed Class Radar",
            json!({ "view": "Class Radar" }),
        ),
        entry(
            "log_004",
            "2025-06-21 11:45:00",
            "dpo_001",
            "DPO",
            "Exported Audit Log Data",
            json!({ "format": "JSON", "dateRange": "2025-06-01 to 2025-06-21" }),
        ),
        entry(
            "log_005",
            "2025-06-21 13:20:05",
            "teacher_456",
            "Teacher",
            "Accessed Student Drill-Down for STU-1234",
            json!({ "studentId": "STU-1234", "view": "Student Drill-Down" }),
        ),
    ]
}
