use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tower_cookies::Cookies;
use tracing::{debug, warn};
use tutordash_core::{Role, SessionStore as _};
use tutordash_core::access::{AccessProfile, Permission};
use tutordash_core::audit::AuditLogEntry;
use tutordash_core::radar::RadarItem;
use tutordash_core::student::{MasteryEntry, TimelineEvent, find_student};
use tutordash_core::view::DashboardView;
use tutordash_util_error::FmtCompact as _;

use crate::session::bearer_token;
use crate::{LOG_TARGET, SharedState, UiState};

const AUDIT_LOG_LIMIT: usize = 50;

#[derive(Serialize)]
struct ApiErrorResponse {
    error: String,
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> (StatusCode, Json<ApiErrorResponse>) {
    (status, Json(ApiErrorResponse { error: msg.into() }))
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

// -- Extractors --

/// The agent calling the API, identified by a bearer token or, failing
/// that, the session cookie.
struct ApiUser(AccessProfile);

impl FromRequestParts<Arc<UiState>> for ApiUser {
    type Rejection = (StatusCode, Json<ApiErrorResponse>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<UiState>,
    ) -> Result<Self, Self::Rejection> {
        let token = match bearer_token(parts) {
            Some(token) => Some(token),
            None => Cookies::from_request_parts(parts, state)
                .await
                .ok()
                .and_then(|cookies| state.session_store(cookies).read()),
        };

        token
            .and_then(|token| state.profile_for(&token))
            .map(ApiUser)
            .ok_or_else(|| {
                api_error(
                    StatusCode::UNAUTHORIZED,
                    "Invalid or missing authentication token",
                )
            })
    }
}

impl ApiUser {
    fn require(&self, allowed: bool, what: &str) -> ApiResult<()> {
        if allowed {
            return Ok(());
        }
        debug!(
            target: LOG_TARGET,
            user_id = %self.0.user_id,
            what,
            "API access denied"
        );
        Err(api_error(
            StatusCode::FORBIDDEN,
            format!("Insufficient permissions to access {what}"),
        ))
    }
}

// -- Router --

pub fn api_router() -> Router<Arc<UiState>> {
    Router::new()
        .route("/", get(get_root))
        .route("/user-info", get(get_user_info))
        .route("/class-radar", get(get_class_radar))
        .route("/student/{student_id}", get(get_student))
        .route("/audit-logs", get(get_audit_logs))
        .route("/log-action", post(post_log_action))
}

// -- Handlers --

#[derive(Serialize)]
struct RootResponse {
    message: &'static str,
    version: &'static str,
}

async fn get_root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "K-12 LLM Tutor Dashboard API",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct UserInfoResponse {
    role: Role,
    permissions: &'static [Permission],
    class_ids: Vec<String>,
}

async fn get_user_info(ApiUser(profile): ApiUser) -> Json<UserInfoResponse> {
    Json(UserInfoResponse {
        role: profile.role,
        permissions: profile.permissions,
        class_ids: profile.classes.to_wire(),
    })
}

#[derive(Serialize)]
struct ClassRadarResponse {
    data: Vec<RadarItem>,
    user_role: Role,
    permissions: &'static [Permission],
    timestamp: String,
}

async fn get_class_radar(
    state: State<SharedState>,
    user: ApiUser,
) -> ApiResult<Json<ClassRadarResponse>> {
    user.require(
        DashboardView::ClassRadar.is_visible_to(&user.0),
        "class radar data",
    )?;

    let data = state
        .class_data
        .fetch_class_radar(&user.0.user_id)
        .await
        .map_err(|err| {
            warn!(target: LOG_TARGET, err = %err.fmt_compact(), "Class data unavailable");
            api_error(
                StatusCode::BAD_GATEWAY,
                format!("Class data unavailable: {}", err.fmt_compact()),
            )
        })?;

    Ok(Json(ClassRadarResponse {
        data,
        user_role: user.0.role,
        permissions: user.0.permissions,
        timestamp: now_rfc3339()?,
    }))
}

#[derive(Serialize)]
struct StudentResponse {
    student_name: &'static str,
    student_id: &'static str,
    timeline_events: Vec<TimelineEvent>,
    mastery_summary: Vec<MasteryEntry>,
    user_role: Role,
}

async fn get_student(
    user: ApiUser,
    Path(student_id): Path<String>,
) -> ApiResult<Json<StudentResponse>> {
    user.require(
        DashboardView::StudentDrillDown.is_visible_to(&user.0),
        "student data",
    )?;

    let student = find_student(&student_id).ok_or_else(|| {
        api_error(
            StatusCode::NOT_FOUND,
            "Student not found or no interactions recorded",
        )
    })?;
    user.require(user.0.classes.includes(student.class_id), "this student")?;

    Ok(Json(StudentResponse {
        mastery_summary: student.mastery(),
        student_name: student.name,
        student_id: student.student_id,
        timeline_events: student.timeline,
        user_role: user.0.role,
    }))
}

#[derive(Serialize)]
struct AuditLogsResponse {
    audit_logs: Vec<AuditLogEntry>,
    user_role: Role,
    total_logs: usize,
}

async fn get_audit_logs(
    state: State<SharedState>,
    user: ApiUser,
) -> ApiResult<Json<AuditLogsResponse>> {
    user.require(user.0.has(Permission::ViewAuditLogs), "audit logs")?;

    let audit_logs = state.audit.recent(AUDIT_LOG_LIMIT);
    Ok(Json(AuditLogsResponse {
        total_logs: audit_logs.len(),
        audit_logs,
        user_role: user.0.role,
    }))
}

#[derive(Deserialize, Default)]
struct LogActionInput {
    #[serde(default)]
    action_type: Option<String>,
    #[serde(default)]
    details: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct LogActionResponse {
    status: &'static str,
    message: &'static str,
}

async fn post_log_action(
    state: State<SharedState>,
    ApiUser(profile): ApiUser,
    body: Bytes,
) -> ApiResult<Json<LogActionResponse>> {
    // An empty body logs an unknown action.
    let input: LogActionInput = if body.is_empty() {
        LogActionInput::default()
    } else {
        serde_json::from_slice(&body).map_err(|err| {
            api_error(StatusCode::BAD_REQUEST, format!("Invalid JSON body: {err}"))
        })?
    };

    state.audit.record_now(
        profile.user_id.as_str(),
        profile.role,
        input
            .action_type
            .unwrap_or_else(|| "UNKNOWN_ACTION".to_owned()),
        input
            .details
            .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
    );

    Ok(Json(LogActionResponse {
        status: "success",
        message: "Action logged successfully",
    }))
}

fn now_rfc3339() -> ApiResult<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|_| api_error(StatusCode::INTERNAL_SERVER_ERROR, "Clock formatting failed"))
}
