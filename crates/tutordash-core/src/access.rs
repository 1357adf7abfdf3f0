//! What each token is allowed to see.

use std::fmt;

use serde::Serialize;

use crate::{Role, RoleResolver, SessionToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewClassData,
    ViewStudentProgress,
    ModifySettings,
    ViewAllData,
    ExportData,
    ManageUsers,
    ViewAuditLogs,
    ManagePrivacy,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Permission::ViewClassData => "view_class_data",
            Permission::ViewStudentProgress => "view_student_progress",
            Permission::ModifySettings => "modify_settings",
            Permission::ViewAllData => "view_all_data",
            Permission::ExportData => "export_data",
            Permission::ManageUsers => "manage_users",
            Permission::ViewAuditLogs => "view_audit_logs",
            Permission::ManagePrivacy => "manage_privacy",
        })
    }
}

/// Classes a profile may see data for. `*` in the wire format means all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassScope {
    All,
    Only(&'static [&'static str]),
}

impl ClassScope {
    pub fn includes(self, class_id: &str) -> bool {
        match self {
            ClassScope::All => true,
            ClassScope::Only(ids) => ids.iter().any(|id| *id == class_id),
        }
    }

    pub fn to_wire(self) -> Vec<String> {
        match self {
            ClassScope::All => vec!["*".to_owned()],
            ClassScope::Only(ids) => ids.iter().map(|id| (*id).to_owned()).collect(),
        }
    }
}

const TEACHER_PERMISSIONS: &[Permission] = &[
    Permission::ViewClassData,
    Permission::ViewStudentProgress,
    Permission::ModifySettings,
];

const ADMINISTRATOR_PERMISSIONS: &[Permission] = &[
    Permission::ViewAllData,
    Permission::ModifySettings,
    Permission::ExportData,
    Permission::ManageUsers,
    Permission::ViewAuditLogs,
    Permission::ManagePrivacy,
];

const DPO_PERMISSIONS: &[Permission] = &[
    Permission::ViewAuditLogs,
    Permission::ExportData,
    Permission::ManagePrivacy,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessProfile {
    pub user_id: SessionToken,
    pub role: Role,
    pub permissions: &'static [Permission],
    pub classes: ClassScope,
}

impl AccessProfile {
    /// Look up the profile of a token issued by `resolver`.
    ///
    /// `None` for tokens the table doesn't know, which callers treat as
    /// anonymous.
    pub fn for_token(resolver: &RoleResolver, token: &SessionToken) -> Option<Self> {
        let role = resolver.role_for_token(token)?;
        let (permissions, classes) = Self::grants(role);
        Some(Self {
            user_id: token.clone(),
            role,
            permissions,
            classes,
        })
    }

    fn grants(role: Role) -> (&'static [Permission], ClassScope) {
        match role {
            Role::Teacher => (TEACHER_PERMISSIONS, ClassScope::Only(&["CLASS_A", "CLASS_B"])),
            Role::Administrator => (ADMINISTRATOR_PERMISSIONS, ClassScope::All),
            Role::Dpo => (DPO_PERMISSIONS, ClassScope::All),
        }
    }

    pub fn has(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn has_any(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.has(*p))
    }
}
