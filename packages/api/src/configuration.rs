//! Connector configuration advertised to the host.

use serde::{Deserialize, Serialize};

/// How the host obtains credentials for this repository.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum DepositType {
    /// Credentials come from configured defaults or user-supplied fields.
    #[default]
    SystemDeposit,
    /// An OAuth flow hands the connector a token. Not used by Fedora.
    UserDeposit,
    BothWaysDeposit,
}

/// The repository description returned by `configuration()`.
///
/// `repository_url` plus the optional `collection` form the base URL new
/// objects are created under.
///
/// # Example
///
/// ```json
/// {
///   "depositType": "systemDeposit",
///   "repositoryId": "Fedora",
///   "repositoryUrl": "http://fedora.example.org/rest",
///   "collection": "plans",
///   "useSharedStorage": false,
///   "hasLogo": true,
///   "userConfigurationFields": [
///     { "code": "fedora-username", "label": "Username", "fieldType": "text" },
///     { "code": "fedora-password", "label": "Password", "fieldType": "secret" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DepositConfiguration {
    #[serde(default)]
    pub deposit_type: DepositType,

    pub repository_id: String,

    pub repository_url: String,

    /// Prefix under which deposited records are publicly browsable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_record_url: Option<String>,

    /// Collection path below `repository_url`. Absent means the repository root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,

    /// Artifacts carry shared-storage references instead of inline bytes.
    #[serde(default)]
    pub use_shared_storage: bool,

    #[serde(default)]
    pub has_logo: bool,

    /// Fields the host asks the user to fill in before depositing.
    #[serde(default, deserialize_with = "fedora_deposit::types::null_as_default")]
    pub user_configuration_fields: Vec<UserConfigurationField>,
}

impl DepositConfiguration {
    /// `repository_url[/collection]` without a trailing slash.
    pub fn base_url(&self) -> String {
        let root = self.repository_url.trim_end_matches('/');
        match self.collection.as_deref().map(|c| c.trim_matches('/')) {
            Some(c) if !c.is_empty() => format!("{root}/{c}"),
            _ => root.to_string(),
        }
    }
}

/// Descriptor of one user-supplied field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserConfigurationField {
    pub code: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub field_type: UserFieldType,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserFieldType {
    #[default]
    Text,
    Secret,
}
