use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{Method, header};
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};
use tracing::debug;
use tutordash_core::SessionStore;
use tutordash_core::access::AccessProfile;
use tutordash_core::session::{SESSION_COOKIE_NAME, SESSION_LIFETIME, SESSION_PATH};
use tutordash_core::{Role, SessionToken};

use crate::error::{InternalServerSnafu, LoginRequiredSnafu, RequestError};
use crate::{LOG_TARGET, SharedState, UiState};

const SIDEBAR_COOKIE_NAME: &str = "sidebar:state";

/// [`SessionStore`] backed by the `auth_token` cookie of the current request.
///
/// Expiry is enforced by the browser through `Max-Age`.
#[derive(Clone)]
pub(crate) struct CookieSessionStore {
    cookies: Cookies,
    secure: bool,
}

impl CookieSessionStore {
    pub(crate) fn new(cookies: Cookies, secure: bool) -> Self {
        Self { cookies, secure }
    }
}

impl SessionStore for CookieSessionStore {
    fn create(&self, token: SessionToken) {
        let cookie = Cookie::build((SESSION_COOKIE_NAME, token.as_str().to_owned()))
            .http_only(true)
            .secure(self.secure)
            .max_age(SESSION_LIFETIME)
            .path(SESSION_PATH)
            .same_site(SameSite::Lax)
            .build();
        self.cookies.add(cookie);
    }

    fn read(&self) -> Option<SessionToken> {
        self.cookies
            .get(SESSION_COOKIE_NAME)
            .map(|cookie| SessionToken::new(cookie.value()))
    }

    fn delete(&self) {
        self.cookies
            .remove(Cookie::build(SESSION_COOKIE_NAME).path(SESSION_PATH).build());
    }
}

impl UiState {
    pub(crate) fn session_store(&self, cookies: Cookies) -> CookieSessionStore {
        CookieSessionStore::new(cookies, self.secure_cookies)
    }

    /// Profile of the agent holding `token`, if the token is one we issue.
    pub(crate) fn profile_for(&self, token: &SessionToken) -> Option<AccessProfile> {
        let profile = AccessProfile::for_token(&self.resolver, token);
        if profile.is_none() {
            debug!(target: LOG_TARGET, "Ignoring session with unknown token");
        }
        profile
    }
}

/// A logged in agent, recovered from the session cookie.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub profile: AccessProfile,
}

impl AuthenticatedUser {
    pub(crate) fn role(&self) -> Role {
        self.profile.role
    }

    pub(crate) fn token(&self) -> &SessionToken {
        &self.profile.user_id
    }
}

async fn cookies_from_parts(parts: &mut Parts, state: &SharedState) -> Result<Cookies, RequestError> {
    Cookies::from_request_parts(parts, state)
        .await
        .map_err(|(_, msg)| InternalServerSnafu { msg }.build())
}

impl FromRequestParts<SharedState> for AuthenticatedUser {
    type Rejection = RequestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let cookies = cookies_from_parts(parts, state).await?;

        state
            .session_store(cookies)
            .read()
            .and_then(|token| state.profile_for(&token))
            .map(|profile| AuthenticatedUser { profile })
            .ok_or_else(|| {
                // Only pages can be returned to after logging in.
                let redirect =
                    (parts.method == Method::GET).then(|| parts.uri.path().to_owned());
                LoginRequiredSnafu { redirect }.build()
            })
    }
}

/// Like [`AuthenticatedUser`], but anonymous agents are not rejected.
pub struct OptionalUser(pub Option<AuthenticatedUser>);

impl FromRequestParts<SharedState> for OptionalUser {
    type Rejection = RequestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        match AuthenticatedUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(OptionalUser(Some(user))),
            Err(RequestError::LoginRequired { .. }) => Ok(OptionalUser(None)),
            Err(err) => Err(err),
        }
    }
}

/// Token sent as `Authorization: Bearer <token>`, if any.
pub(crate) fn bearer_token(parts: &Parts) -> Option<SessionToken> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| SessionToken::new(token))
}

pub(crate) trait CookiesExt {
    /// Whether the sidebar is expanded; collapsed unless explicitly opened.
    fn get_sidebar_open(&self) -> bool;

    fn save_sidebar_open(&self, open: bool);
}

impl CookiesExt for Cookies {
    fn get_sidebar_open(&self) -> bool {
        self.get(SIDEBAR_COOKIE_NAME)
            .is_some_and(|cookie| cookie.value() == "true")
    }

    fn save_sidebar_open(&self, open: bool) {
        let mut cookie = Cookie::new(SIDEBAR_COOKIE_NAME, open.to_string());
        cookie.set_path("/");
        cookie.set_max_age(time::Duration::weeks(50));
        self.add(cookie);
    }
}

#[cfg(test)]
mod tests;
