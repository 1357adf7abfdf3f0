use std::fmt;

use crate::access::{AccessProfile, Permission};

/// A dashboard page selectable from the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DashboardView {
    #[default]
    ClassRadar,
    StudentDrillDown,
    OverridePanel,
    AuditLogViewer,
}

impl DashboardView {
    pub const ALL: [DashboardView; 4] = [
        DashboardView::ClassRadar,
        DashboardView::StudentDrillDown,
        DashboardView::OverridePanel,
        DashboardView::AuditLogViewer,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            DashboardView::ClassRadar => "class-radar",
            DashboardView::StudentDrillDown => "student-drill-down",
            DashboardView::OverridePanel => "override-panel",
            DashboardView::AuditLogViewer => "audit-log-viewer",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DashboardView::ClassRadar => "Class Radar",
            DashboardView::StudentDrillDown => "Student Drill-Down",
            DashboardView::OverridePanel => "Override Panel",
            DashboardView::AuditLogViewer => "Audit Log Viewer",
        }
    }

    /// Unknown slugs select the default view.
    pub fn from_slug(slug: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|view| view.slug() == slug)
            .unwrap_or_default()
    }

    pub fn href(self) -> String {
        format!("/view/{}", self.slug())
    }

    /// Any one of these grants access.
    pub fn required_permissions(self) -> &'static [Permission] {
        match self {
            DashboardView::ClassRadar => &[Permission::ViewClassData, Permission::ViewAllData],
            DashboardView::StudentDrillDown => {
                &[Permission::ViewStudentProgress, Permission::ViewAllData]
            }
            DashboardView::OverridePanel => &[Permission::ModifySettings],
            DashboardView::AuditLogViewer => &[Permission::ViewAuditLogs],
        }
    }

    pub fn is_visible_to(self, profile: &AccessProfile) -> bool {
        profile.has_any(self.required_permissions())
    }

    /// Views to list in the sidebar for `profile`, in menu order.
    pub fn visible_to(profile: &AccessProfile) -> impl Iterator<Item = DashboardView> + '_ {
        Self::ALL
            .into_iter()
            .filter(|view| view.is_visible_to(profile))
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
