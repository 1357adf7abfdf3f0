use std::collections::BTreeMap;

use axum::Form;
use axum::extract::State;
use axum::response::IntoResponse;
use maud::{Markup, html};
use time::OffsetDateTime;
use tracing::info;

use super::Maud;
use crate::{LOG_TARGET, SharedState, UiState};

/// Launch parameters a tool consumer would post, in form order.
fn default_launch_params(now: OffsetDateTime) -> Vec<(&'static str, String)> {
    vec![
        ("lis_person_sourcedid", "student_123".to_owned()),
        ("lis_person_name_full", "John Doe".to_owned()),
        ("context_title", "Algebra I - Fall 2025".to_owned()),
        ("roles", "Student".to_owned()),
        ("oauth_consumer_key", "mock_consumer_key".to_owned()),
        ("oauth_signature", "mock_signature".to_owned()),
        ("oauth_timestamp", now.unix_timestamp().to_string()),
        ("oauth_nonce", format!("{:x}", now.unix_timestamp_nanos())),
        ("oauth_version", "1.0".to_owned()),
        ("oauth_signature_method", "HMAC-SHA1".to_owned()),
        ("lti_message_type", "basic-lti-launch-request".to_owned()),
        ("lti_version", "LTI-1p0".to_owned()),
        ("resource_link_id", "mock_resource_link_id".to_owned()),
    ]
}

fn is_read_only(name: &str) -> bool {
    name.starts_with("oauth_") || name.starts_with("lti_")
}

pub async fn get(state: State<SharedState>) -> impl IntoResponse {
    Maud(state.lti_page(&default_launch_params(OffsetDateTime::now_utc()), None))
}

pub async fn post_launch(
    state: State<SharedState>,
    Form(params): Form<BTreeMap<String, String>>,
) -> impl IntoResponse {
    info!(target: LOG_TARGET, ?params, "Simulated LTI launch");

    let received = html! {
        div ."o-notice -success" role="status" {
            h3 { "LTI Launch Simulated!" }
            p { "No signature verification was performed. Received parameters:" }
            dl ."o-ltiLaunch__received" {
                @for (name, value) in &params {
                    dt { (name) }
                    dd { (value) }
                }
            }
        }
    };
    let fields: Vec<(&str, String)> = params
        .iter()
        .map(|(name, value)| (name.as_str(), value.clone()))
        .collect();
    Maud(state.lti_page(&fields, Some(received)))
}

impl UiState {
    fn lti_page(&self, params: &[(&str, String)], notification: Option<Markup>) -> Markup {
        let content = html! {
            div ."o-ltiLaunch" {
                h2 { "Simulated LTI Launch Page" }
                p { "Edit the launch parameters and submit them as a tool consumer would." }
                @if let Some(n) = notification {
                    (n)
                }
                form ."o-ltiLaunch__form" action="/lti-launch" method="post" {
                    @for (name, value) in params {
                        label ."o-ltiLaunch__field" {
                            span { (name) }
                            input type="text" name=(name) value=(value) readonly[is_read_only(name)];
                        }
                    }
                    button ."u-button" type="submit" { "Launch" }
                }
            }
        };
        self.render_html_page("LTI Launch", content)
    }
}
