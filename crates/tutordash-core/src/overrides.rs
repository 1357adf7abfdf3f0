//! Tutor behavior overrides.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use snafu::Snafu;

pub const DEFAULT_HINT_STRICTNESS: u8 = 50;
pub const MAX_HINT_STRICTNESS: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelInput {
    #[default]
    Default,
    Simplified,
    Advanced,
    Custom,
}

impl ModelInput {
    pub const ALL: [ModelInput; 4] = [
        ModelInput::Default,
        ModelInput::Simplified,
        ModelInput::Advanced,
        ModelInput::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelInput::Default => "default",
            ModelInput::Simplified => "simplified",
            ModelInput::Advanced => "advanced",
            ModelInput::Custom => "custom",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ModelInput::Default => "Default (Standard Curriculum)",
            ModelInput::Simplified => "Simplified Language (ELL Support)",
            ModelInput::Advanced => "Advanced Concepts (Gifted Students)",
            ModelInput::Custom => "Custom Feature Set",
        }
    }
}

impl fmt::Display for ModelInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Snafu)]
#[snafu(display("Unknown model input: {value:?}"))]
pub struct UnknownModelInputError {
    value: String,
}

impl FromStr for ModelInput {
    type Err = UnknownModelInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelInput::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownModelInputSnafu { value: s }.build())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverrideSettings {
    hint_strictness: u8,
    pub model_input: ModelInput,
    custom_feature: Option<String>,
}

impl Default for OverrideSettings {
    fn default() -> Self {
        Self {
            hint_strictness: DEFAULT_HINT_STRICTNESS,
            model_input: ModelInput::default(),
            custom_feature: None,
        }
    }
}

impl OverrideSettings {
    /// Values above the maximum are clamped, a blank custom feature is
    /// dropped.
    pub fn new(hint_strictness: u32, model_input: ModelInput, custom_feature: Option<&str>) -> Self {
        let hint_strictness = hint_strictness.min(u32::from(MAX_HINT_STRICTNESS)) as u8;
        let custom_feature = custom_feature
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(ToOwned::to_owned);
        Self {
            hint_strictness,
            model_input,
            custom_feature,
        }
    }

    pub fn hint_strictness(&self) -> u8 {
        self.hint_strictness
    }

    pub fn custom_feature(&self) -> Option<&str> {
        self.custom_feature.as_deref()
    }

    /// Action text recorded in the audit trail.
    pub fn audit_action(&self) -> String {
        format!(
            "Modified Override Panel: Hint Strictness to {}%",
            self.hint_strictness
        )
    }

    pub fn audit_details(&self) -> serde_json::Value {
        serde_json::json!({
            "panel": "Override Panel",
            "hintStrictness": format!("{}%", self.hint_strictness),
            "modelInput": self.model_input,
            "customFeature": self.custom_feature,
        })
    }
}
