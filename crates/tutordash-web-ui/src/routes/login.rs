use axum::Form;
use axum::extract::rejection::FormRejection;
use axum::extract::{Query, State};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Redirect, Response};
use maud::{Markup, html};
use serde::Deserialize;
use tower_cookies::Cookies;
use tracing::{debug, info};
use tutordash_core::{LoginError, Role, SessionStore as _};

use super::Maud;
use crate::layout::render_notice;
use crate::serde_util::empty_string_as_none;
use crate::session::OptionalUser;
use crate::{LOG_TARGET, SharedState, UiState};

#[derive(Deserialize)]
pub struct RedirectQuery {
    #[serde(default)]
    #[serde(deserialize_with = "empty_string_as_none")]
    redirect: Option<String>,
}

pub async fn get(
    state: State<SharedState>,
    OptionalUser(current): OptionalUser,
    Query(query): Query<RedirectQuery>,
) -> impl IntoResponse {
    Maud(state.login_page(current.map(|user| user.role()), None, query.redirect))
}

#[derive(Deserialize)]
pub struct Input {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    #[serde(deserialize_with = "empty_string_as_none")]
    redirect: Option<String>,
}

pub async fn post_login(
    state: State<SharedState>,
    cookies: Cookies,
    form: Result<Form<Input>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => Some(form),
        Err(err) => {
            debug!(target: LOG_TARGET, %err, "Login without form data");
            None
        }
    };
    // A present form without a role field is a selection of nothing.
    let submission = form
        .as_ref()
        .map(|form| form.role.as_deref().unwrap_or_default());
    let redirect = form.as_ref().and_then(|form| form.redirect.clone());

    let resolved = match state.resolver.resolve_submission(submission) {
        Ok(resolved) => resolved,
        Err(err) => {
            return Maud(state.login_page(None, Some(&err), redirect)).into_response();
        }
    };

    state.session_store(cookies).create(resolved.token);
    info!(target: LOG_TARGET, role = %resolved.role, "Logged in");

    Redirect::to(&safe_redirect_target(redirect)).into_response()
}

pub async fn logout(state: State<SharedState>, cookies: Cookies) -> impl IntoResponse {
    state.session_store(cookies).delete();
    info!(target: LOG_TARGET, "Logged out");

    Redirect::to("/login")
}

/// Only local paths are followed; anything else lands on the dashboard.
pub(super) fn safe_redirect_target(redirect: Option<String>) -> String {
    redirect
        .filter(|path| is_local_path(path))
        .unwrap_or_else(|| "/".to_owned())
}

/// Browsers read `/\host` like `//host`, so a backslash can't follow the
/// leading slash. The path has to fit in a `Location` header as is.
fn is_local_path(path: &str) -> bool {
    let mut chars = path.chars();
    chars.next() == Some('/')
        && !matches!(chars.next(), Some('/' | '\\'))
        && !path.chars().any(char::is_control)
        && HeaderValue::from_str(path).is_ok()
}

impl UiState {
    fn login_page(
        &self,
        current_role: Option<Role>,
        error: Option<&LoginError>,
        redirect: Option<String>,
    ) -> Markup {
        let content = html! {
            div id="login-screen" ."o-loginScreen" {
                form ."o-loginScreen__form" action="/login" method="post" {
                    @if let Some(ref redirect_path) = redirect {
                        input type="hidden" name="redirect" value=(redirect_path);
                    }
                    div ."o-loginScreen__header" {
                        h2 { "Tutor Dashboard" }
                        p { "Select a role to sign in to the demo dashboard." }
                        @if let Some(role) = current_role {
                            p ."o-loginScreen__current" {
                                "Currently signed in as " strong { (role.label()) } "."
                            }
                        }
                    }
                    @if let Some(err) = error {
                        (render_notice("error", &err.to_string()))
                    }
                    div ."o-loginScreen__roles" {
                        @for role in Role::ALL {
                            button ."o-loginScreen__roleButton u-button"
                                type="submit"
                                name="role"
                                value=(role.as_str())
                            { "Login as " (role.label()) }
                        }
                    }
                }
            }
        };
        self.render_html_page("Sign in", content)
    }
}

#[cfg(test)]
mod tests {
    use super::safe_redirect_target;

    #[test]
    fn only_local_redirects_are_followed() {
        let target = |s: &str| safe_redirect_target(Some(s.to_owned()));

        assert_eq!(target("/view/audit-log-viewer"), "/view/audit-log-viewer");
        assert_eq!(target("https://example.com/"), "/");
        assert_eq!(target("//example.com/"), "/");
        assert_eq!(target("/\\evil.example"), "/");
        assert_eq!(target("/ok\r\nX-Injected: 1"), "/");
        assert_eq!(target("/view/\u{7f}"), "/");
        assert_eq!(target("/view/caf\u{e9}"), "/");
        assert_eq!(target("/view/a\\b"), "/view/a\\b");
        assert_eq!(safe_redirect_target(None), "/");
    }
}
