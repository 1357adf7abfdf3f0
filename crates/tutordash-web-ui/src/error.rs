use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use maud::html;
use serde::Serialize;
use snafu::Snafu;
use tracing::{debug, warn};
use tutordash_util_error::FmtCompact as _;

use super::routes::{AppJson, Maud};
use crate::LOG_TARGET;

/// Error by the user
#[derive(Debug, Snafu)]
pub enum UserRequestError {
    #[snafu(visibility(pub(crate)))]
    #[snafu(display("{message}"))]
    BadRequest { message: String },
}

impl IntoResponse for &UserRequestError {
    fn into_response(self) -> Response {
        let status_code = match self {
            UserRequestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        };
        (
            status_code,
            AppJson(UserErrorResponse {
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

// How we want user errors responses to be serialized
#[derive(Serialize)]
pub struct UserErrorResponse {
    pub message: String,
}

#[derive(Debug, Snafu)]
pub enum RequestError {
    #[snafu(visibility(pub(crate)))]
    #[snafu(display("InternalServerError: {msg}"))]
    InternalServerError { msg: &'static str },
    #[snafu(visibility(pub(crate)))]
    LoginRequired { redirect: Option<String> },
    #[snafu(visibility(pub(crate)))]
    #[snafu(display("Access to {what} denied"))]
    Forbidden { what: &'static str },
    #[snafu(transparent)]
    User { source: UserRequestError },
}
pub type RequestResult<T> = std::result::Result<T, RequestError>;

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        debug!(
            target: LOG_TARGET,
            err = %self.fmt_compact(),
            "Request Error"
        );

        match self {
            RequestError::LoginRequired { redirect } => {
                let url = match redirect {
                    Some(ref path) => {
                        format!("/login?redirect={}", urlencoding::encode(path))
                    }
                    None => "/login".to_string(),
                };
                Redirect::to(&url).into_response()
            }
            RequestError::Forbidden { what } => (
                StatusCode::FORBIDDEN,
                Maud(html! {
                    div ."o-notice -error" {
                        h2 { "Access denied" }
                        p { "Your role does not have access to the " (what) "." }
                        a href="/" { "Back to dashboard" }
                    }
                }),
            )
                .into_response(),
            RequestError::User { ref source } => source.into_response(),
            err @ RequestError::InternalServerError { .. } => {
                warn!(
                    target: LOG_TARGET,
                    err = %err.fmt_compact(),
                    "Unexpected Request Error"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    AppJson(UserErrorResponse {
                        message: "Internal Service Error".to_owned(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
