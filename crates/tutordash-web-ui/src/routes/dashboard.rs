mod audit;
pub(super) mod overrides;
mod radar;
mod student;

use axum::Form;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use maud::{Markup, html};
use serde::Deserialize;
use tower_cookies::Cookies;
use tracing::debug;
use tutordash_core::view::DashboardView;

use super::Maud;
use super::login::safe_redirect_target;
use crate::serde_util::empty_string_as_none;
use crate::session::{AuthenticatedUser, CookiesExt as _};
use crate::{LOG_TARGET, SharedState, UiState};

/// Filters of all the views; each view reads the ones it knows.
#[derive(Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    #[serde(deserialize_with = "empty_string_as_none")]
    topic: Option<String>,
    #[serde(default)]
    #[serde(deserialize_with = "empty_string_as_none")]
    uncertainty: Option<String>,
    #[serde(default)]
    #[serde(deserialize_with = "empty_string_as_none")]
    student: Option<String>,
    /// Audit log search, kept as typed
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    #[serde(deserialize_with = "empty_string_as_none")]
    role: Option<String>,
}

pub async fn get_default(
    state: State<SharedState>,
    user: AuthenticatedUser,
    cookies: Cookies,
    Query(query): Query<ViewQuery>,
) -> Response {
    state
        .render_view(&user, DashboardView::default(), &query, &cookies)
        .await
}

pub async fn get_view(
    state: State<SharedState>,
    user: AuthenticatedUser,
    cookies: Cookies,
    Path(slug): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Response {
    let view = DashboardView::from_slug(&slug);
    if view.slug() != slug {
        debug!(target: LOG_TARGET, %slug, "Unknown view, showing default");
    }
    state.render_view(&user, view, &query, &cookies).await
}

#[derive(Deserialize)]
pub struct ToggleInput {
    #[serde(default)]
    #[serde(deserialize_with = "empty_string_as_none")]
    redirect: Option<String>,
}

pub async fn toggle_sidebar(cookies: Cookies, Form(form): Form<ToggleInput>) -> impl IntoResponse {
    cookies.save_sidebar_open(!cookies.get_sidebar_open());
    Redirect::to(&safe_redirect_target(form.redirect))
}

impl UiState {
    async fn render_view(
        &self,
        user: &AuthenticatedUser,
        view: DashboardView,
        query: &ViewQuery,
        cookies: &Cookies,
    ) -> Response {
        let sidebar_open = cookies.get_sidebar_open();

        if !view.is_visible_to(&user.profile) {
            debug!(
                target: LOG_TARGET,
                role = %user.role(),
                view = %view,
                "View not permitted"
            );
            let page =
                self.render_dashboard_page(user, view, sidebar_open, render_access_denied(view));
            return (StatusCode::FORBIDDEN, Maud(page)).into_response();
        }

        let (status, content) = match view {
            DashboardView::ClassRadar => {
                (StatusCode::OK, self.render_class_radar(user, query).await)
            }
            DashboardView::StudentDrillDown => {
                student::render_student_drill_down(&user.profile, query.student.as_deref())
            }
            DashboardView::OverridePanel => (
                StatusCode::OK,
                self.render_override_panel(&Default::default(), None),
            ),
            DashboardView::AuditLogViewer => (StatusCode::OK, self.render_audit_log(query)),
        };

        (
            status,
            Maud(self.render_dashboard_page(user, view, sidebar_open, content)),
        )
            .into_response()
    }
}

fn render_access_denied(view: DashboardView) -> Markup {
    html! {
        div ."o-notice -error" role="alert" {
            h2 { "Access denied" }
            p { "Your role does not have access to the " (view.title()) "." }
        }
    }
}
