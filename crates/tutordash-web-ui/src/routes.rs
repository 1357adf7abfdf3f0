mod api;
mod dashboard;
mod login;
mod lti;

use axum::Router;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::{self, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use maud::Markup;

use super::SharedState;
use super::error::UserErrorResponse;

#[derive(Clone, Debug)]
#[must_use]
pub struct Maud(pub Markup);

impl IntoResponse for Maud {
    fn into_response(self) -> Response {
        (
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            )],
            self.0.0,
        )
            .into_response()
    }
}

pub struct AppJson<T>(pub T);

impl<T> IntoResponse for AppJson<T>
where
    axum::Json<T>: IntoResponse,
{
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// HTML, JSON, errors and anything setting a cookie are never cached;
/// stylesheets briefly, other assets for an hour.
pub async fn cache_control(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    const NON_CACHEABLE_CONTENT_TYPES: &[&str] = &["text/html", "application/json"];
    const SHORT_CACHE_CONTENT_TYPES: &[&str] = &["text/css"];

    let content_type = response.headers().get(CONTENT_TYPE).cloned();
    let matches = |types: &[&str]| {
        content_type.as_ref().is_some_and(|content_type| {
            types
                .iter()
                .any(|&ct| content_type.as_bytes().starts_with(ct.as_bytes()))
        })
    };

    let private = !response.status().is_success()
        || response.headers().contains_key(header::SET_COOKIE);

    let cache_control = if private || matches(NON_CACHEABLE_CONTENT_TYPES) {
        "no-store".to_owned()
    } else if content_type.is_none() {
        return response;
    } else if matches(SHORT_CACHE_CONTENT_TYPES) {
        format!("public, max-age={}", 10 * 60)
    } else {
        format!("public, max-age={}", 60 * 60)
    };

    if let Ok(value) = HeaderValue::from_str(&cache_control) {
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }

    response
}

pub async fn not_found(_state: State<SharedState>, _req: Request<Body>) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        AppJson(UserErrorResponse {
            message: "Not Found".to_string(),
        }),
    )
}

pub fn route_handler(state: SharedState) -> Router {
    Router::new()
        .route("/", get(dashboard::get_default))
        .route("/view/{slug}", get(dashboard::get_view))
        .route("/sidebar/toggle", post(dashboard::toggle_sidebar))
        .route("/override", post(dashboard::overrides::post_override))
        .route("/login", get(login::get).post(login::post_login))
        .route("/logout", get(login::logout).post(login::logout))
        .route("/lti-launch", get(lti::get).post(lti::post_launch))
        .nest("/api", api::api_router())
        .fallback(not_found)
        .with_state(state)
}
