//! The `deposit` call argument.

use fedora_deposit::Plan;
use serde::{Deserialize, Serialize};

/// Auth field code carrying the repository username.
pub const FIELD_USERNAME: &str = "fedora-username";
/// Auth field code carrying the repository password.
pub const FIELD_PASSWORD: &str = "fedora-password";

/// A plan to deposit, plus whatever credentials the user supplied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlanDepositModel {
    #[serde(default)]
    pub plan_model: Option<Plan>,
    #[serde(default)]
    pub auth_info: Option<AuthInfo>,
}

impl PlanDepositModel {
    pub fn new(plan: Plan) -> Self {
        Self {
            plan_model: Some(plan),
            auth_info: None,
        }
    }

    /// Attach `fedora-username` / `fedora-password` auth fields.
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth_info = Some(AuthInfo {
            auth_fields: vec![
                PluginUserField::text(FIELD_USERNAME, username),
                PluginUserField::text(FIELD_PASSWORD, password),
            ],
        });
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AuthInfo {
    #[serde(default, deserialize_with = "fedora_deposit::types::null_as_default")]
    pub auth_fields: Vec<PluginUserField>,
}

impl AuthInfo {
    /// Text of the first field with `code`, when present and non-blank.
    pub fn field(&self, code: &str) -> Option<&str> {
        self.auth_fields
            .iter()
            .find(|f| f.code == code)
            .and_then(|f| f.text_value.as_deref())
            .filter(|v| !v.trim().is_empty())
    }
}

/// A value the user entered for one of the configuration's user fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PluginUserField {
    pub code: String,
    #[serde(default)]
    pub text_value: Option<String>,
}

impl PluginUserField {
    pub fn text(code: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            text_value: Some(value.into()),
        }
    }
}
