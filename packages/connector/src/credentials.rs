//! Credential resolution for a single deposit call.
//!
//! Resolution order:
//!
//! 1. `fedora-username` and `fedora-password` auth fields supplied with the
//!    call, when both are non-blank;
//! 2. a caller-owned [`CredentialCache`], when one is passed and populated;
//! 3. the configured default credentials.
//!
//! Nothing is stored on the connector. A host that wants explicit
//! credentials to stick across calls keeps a [`CredentialCache`] for its
//! session and passes it to each call.

use fedora_deposit_api::{AuthInfo, FIELD_PASSWORD, FIELD_USERNAME};

/// Username and password for HTTP Basic authentication.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// `true` when both username and password are blank.
    pub fn is_blank(&self) -> bool {
        self.username.trim().is_empty() && self.password.trim().is_empty()
    }

    fn from_auth_info(info: &AuthInfo) -> Option<Self> {
        let username = info.field(FIELD_USERNAME)?;
        let password = info.field(FIELD_PASSWORD)?;
        Some(Self::new(username, password))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Explicit credentials remembered across calls of one host session.
#[derive(Debug, Clone, Default)]
pub struct CredentialCache {
    credentials: Option<Credentials>,
}

impl CredentialCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&Credentials> {
        self.credentials.as_ref().filter(|c| !c.is_blank())
    }
}

/// Pick the credentials for one call.
///
/// Explicit credentials found in `auth_info` are written to `cache` when a
/// cache is supplied.
pub fn resolve(
    auth_info: Option<&AuthInfo>,
    cache: Option<&mut CredentialCache>,
    defaults: &Credentials,
) -> Credentials {
    let explicit = auth_info.and_then(Credentials::from_auth_info);

    match (explicit, cache) {
        (Some(creds), Some(cache)) => {
            cache.credentials = Some(creds.clone());
            creds
        }
        (Some(creds), None) => creds,
        (None, Some(cache)) => cache.get().cloned().unwrap_or_else(|| defaults.clone()),
        (None, None) => defaults.clone(),
    }
}
