use axum::Form;
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use maud::{Markup, html};
use serde::Deserialize;
use tower_cookies::Cookies;
use tracing::info;
use tutordash_core::access::Permission;
use tutordash_core::overrides::{MAX_HINT_STRICTNESS, ModelInput, OverrideSettings};
use tutordash_core::view::DashboardView;

use crate::error::{BadRequestSnafu, ForbiddenSnafu, RequestResult};
use crate::routes::Maud;
use crate::serde_util::empty_string_as_none_parsed;
use crate::session::{AuthenticatedUser, CookiesExt as _};
use crate::{LOG_TARGET, SharedState, UiState};

#[derive(Deserialize)]
pub struct Input {
    #[serde(default)]
    #[serde(deserialize_with = "empty_string_as_none_parsed")]
    hint_strictness: Option<u32>,
    #[serde(default)]
    #[serde(deserialize_with = "empty_string_as_none_parsed")]
    model_input: Option<ModelInput>,
    #[serde(default)]
    custom_feature: Option<String>,
}

impl Input {
    fn settings(&self) -> OverrideSettings {
        let defaults = OverrideSettings::default();
        OverrideSettings::new(
            self.hint_strictness
                .unwrap_or(u32::from(defaults.hint_strictness())),
            self.model_input.unwrap_or(defaults.model_input),
            self.custom_feature.as_deref(),
        )
    }
}

pub async fn post_override(
    state: State<SharedState>,
    user: AuthenticatedUser,
    cookies: Cookies,
    form: Result<Form<Input>, FormRejection>,
) -> RequestResult<Maud> {
    if !user.profile.has(Permission::ModifySettings) {
        return ForbiddenSnafu {
            what: "override panel",
        }
        .fail();
    }

    let Form(form) = form.map_err(|err| {
        BadRequestSnafu {
            message: err.body_text(),
        }
        .build()
    })?;
    let settings = form.settings();

    info!(
        target: LOG_TARGET,
        user_id = %user.token(),
        hint_strictness = settings.hint_strictness(),
        model_input = %settings.model_input,
        custom_feature = settings.custom_feature().unwrap_or("N/A"),
        "Override applied"
    );
    state.audit.record_now(
        user.token().as_str(),
        user.role(),
        settings.audit_action(),
        settings.audit_details(),
    );

    let content = state.render_override_panel(&settings, Some(&settings));
    Ok(Maud(state.render_dashboard_page(
        &user,
        DashboardView::OverridePanel,
        cookies.get_sidebar_open(),
        content,
    )))
}

impl UiState {
    /// Override form prefilled with `current`, plus a confirmation of
    /// `applied` settings if any.
    pub(super) fn render_override_panel(
        &self,
        current: &OverrideSettings,
        applied: Option<&OverrideSettings>,
    ) -> Markup {
        html! {
            section ."o-overridePanel" {
                p { "Adjust how the tutor behaves for your classes. Changes are recorded in the audit log." }
                @if let Some(applied) = applied {
                    div ."o-notice -success" role="status" {
                        h3 { "Overrides applied" }
                        ul {
                            li { "Hint strictness: " (applied.hint_strictness()) "%" }
                            li { "Model input: " (applied.model_input.description()) }
                            li { "Custom feature: " (applied.custom_feature().unwrap_or("N/A")) }
                        }
                    }
                }
                form ."o-overridePanel__form" action="/override" method="post" {
                    label {
                        "Hint strictness"
                        input type="range" name="hint_strictness"
                            min="0" max=(MAX_HINT_STRICTNESS) step="5"
                            value=(current.hint_strictness());
                    }
                    label {
                        "Model input"
                        select name="model_input" {
                            @for input in ModelInput::ALL {
                                option value=(input) selected[input == current.model_input] {
                                    (input.description())
                                }
                            }
                        }
                    }
                    label {
                        "Custom feature"
                        input type="text" name="custom_feature"
                            placeholder="e.g. extra visual aids"
                            value=(current.custom_feature().unwrap_or_default());
                    }
                    button ."u-button" type="submit" { "Apply overrides" }
                }
            }
        }
    }
}
