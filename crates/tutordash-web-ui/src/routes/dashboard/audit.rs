use maud::{Markup, html};
use tutordash_core::Role;
use tutordash_core::audit::AuditFilter;
use tutordash_core::view::DashboardView;

use super::ViewQuery;
use crate::UiState;

impl UiState {
    pub(super) fn render_audit_log(&self, query: &ViewQuery) -> Markup {
        let search = query.search.as_deref().unwrap_or_default();
        let role = query.role.as_deref().unwrap_or("all");
        let entries = self
            .audit
            .filtered(&AuditFilter::from_query(Some(search), Some(role)));

        html! {
            section ."o-auditLog" {
                form ."o-auditLog__filters" action=(DashboardView::AuditLogViewer.href()) method="get" {
                    input type="search" name="search" value=(search)
                        placeholder="Search by action, user or log id";
                    select name="role" {
                        option value="all" selected[role == "all"] { "All roles" }
                        @for r in Role::ALL {
                            option value=(r.label()) selected[role == r.label()] { (r.label()) }
                        }
                    }
                    button ."u-button" type="submit" { "Filter" }
                }
                @if entries.is_empty() {
                    p ."o-auditLog__empty" { "No logs found matching your criteria." }
                } @else {
                    table ."o-auditLog__table" {
                        thead {
                            tr {
                                th { "Id" }
                                th { "Timestamp" }
                                th { "User" }
                                th { "Role" }
                                th { "Action" }
                                th { "Details" }
                            }
                        }
                        tbody {
                            @for entry in &entries {
                                tr {
                                    td { (entry.id) }
                                    td { (entry.timestamp) }
                                    td { (entry.user_id) }
                                    td { (entry.role) }
                                    td { (entry.action) }
                                    td { code { (entry.details) } }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
