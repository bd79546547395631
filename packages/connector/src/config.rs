//! Connector settings, populated from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use fedora_deposit::{SemanticsConfig, UnknownSemanticPath};
use fedora_deposit_api::{
    DepositConfiguration, DepositType, UserConfigurationField, UserFieldType, FIELD_PASSWORD,
    FIELD_USERNAME,
};

use crate::credentials::Credentials;

/// Errors raised while reading settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("FEDORA_SEMANTICS: {0}")]
    Semantics(#[from] UnknownSemanticPath),
}

/// Runtime settings for a Fedora connector.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `FEDORA_REPOSITORY_URL` | (absent = no deposit configuration) | Repository REST base URL |
/// | `FEDORA_COLLECTION` | (absent) | Collection path below the base URL |
/// | `FEDORA_REPOSITORY_ID` | `Fedora` | Repository id shown to the host |
/// | `FEDORA_RECORD_URL` | (absent) | Public record URL prefix |
/// | `FEDORA_USERNAME` / `FEDORA_PASSWORD` | empty | Default credentials |
/// | `FEDORA_DOMAIN` | `http://localhost/` | Platform URL used in public browse links |
/// | `FEDORA_LOGO` | (absent) | Path to the repository logo |
/// | `FEDORA_USE_SHARED_STORAGE` | `false` | Read artifacts from shared storage |
/// | `FEDORA_STORAGE_DIR` | `./storage` | Shared storage root |
/// | `FEDORA_MAX_IN_MEMORY_BYTES` | `10485760` | Largest repository response accepted |
/// | `FEDORA_TIMEOUT_SECS` | `60` | Per-request transport timeout |
/// | `FEDORA_SEMANTICS` | every `fedora.*` path | Comma-separated accepted semantic paths |
#[derive(Debug, Clone)]
pub struct FedoraSettings {
    /// What the connector advertises. `None` turns every deposit into a no-op.
    pub deposit_configuration: Option<DepositConfiguration>,

    /// Used when a deposit call supplies no credentials of its own.
    pub default_credentials: Credentials,

    /// Platform URL prefixed to public plan browse links.
    pub domain: String,

    pub logo: Option<PathBuf>,

    pub storage_dir: PathBuf,

    pub max_in_memory_bytes: usize,

    pub timeout: Duration,

    pub semantics: SemanticsConfig,
}

impl FedoraSettings {
    pub const DEFAULT_MAX_IN_MEMORY_BYTES: usize = 10 * 1024 * 1024;

    /// Settings pointing at `repository_url`, everything else defaulted.
    pub fn new(repository_url: impl Into<String>) -> Self {
        Self {
            deposit_configuration: Some(default_deposit_configuration(repository_url.into())),
            default_credentials: Credentials::default(),
            domain: "http://localhost/".into(),
            logo: None,
            storage_dir: PathBuf::from("./storage"),
            max_in_memory_bytes: Self::DEFAULT_MAX_IN_MEMORY_BYTES,
            timeout: Duration::from_secs(60),
            semantics: SemanticsConfig::default(),
        }
    }

    /// Populate settings from environment variables, applying defaults where absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let use_shared_storage = match var("FEDORA_USE_SHARED_STORAGE") {
            Some(v) => parse_bool("FEDORA_USE_SHARED_STORAGE", &v)?,
            None => false,
        };
        let logo = var("FEDORA_LOGO").filter(|v| !v.trim().is_empty()).map(PathBuf::from);

        let deposit_configuration = var("FEDORA_REPOSITORY_URL").map(|url| {
            let mut cfg = default_deposit_configuration(url);
            cfg.repository_id = var("FEDORA_REPOSITORY_ID").unwrap_or(cfg.repository_id);
            cfg.repository_record_url = var("FEDORA_RECORD_URL");
            cfg.collection = var("FEDORA_COLLECTION");
            cfg.use_shared_storage = use_shared_storage;
            cfg.has_logo = logo.is_some();
            cfg
        });

        let max_in_memory_bytes = match var("FEDORA_MAX_IN_MEMORY_BYTES") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                var: "FEDORA_MAX_IN_MEMORY_BYTES",
                expected: "a byte count",
                value: v,
            })?,
            None => Self::DEFAULT_MAX_IN_MEMORY_BYTES,
        };

        let timeout_secs: u64 = match var("FEDORA_TIMEOUT_SECS") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                var: "FEDORA_TIMEOUT_SECS",
                expected: "a number of seconds",
                value: v,
            })?,
            None => 60,
        };

        let semantics = match var("FEDORA_SEMANTICS") {
            Some(v) => SemanticsConfig::from_names(v.split(',').filter(|s| !s.trim().is_empty()))?,
            None => SemanticsConfig::default(),
        };

        Ok(Self {
            deposit_configuration,
            default_credentials: Credentials::new(
                var("FEDORA_USERNAME").unwrap_or_default(),
                var("FEDORA_PASSWORD").unwrap_or_default(),
            ),
            domain: var("FEDORA_DOMAIN").unwrap_or_else(|| "http://localhost/".into()),
            logo,
            storage_dir: var("FEDORA_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./storage")),
            max_in_memory_bytes,
            timeout: Duration::from_secs(timeout_secs),
            semantics,
        })
    }
}

fn default_deposit_configuration(repository_url: String) -> DepositConfiguration {
    DepositConfiguration {
        deposit_type: DepositType::SystemDeposit,
        repository_id: "Fedora".into(),
        repository_url,
        repository_record_url: None,
        collection: None,
        use_shared_storage: false,
        has_logo: false,
        user_configuration_fields: vec![
            UserConfigurationField {
                code: FIELD_USERNAME.into(),
                label: "Fedora username".into(),
                placeholder: None,
                field_type: UserFieldType::Text,
            },
            UserConfigurationField {
                code: FIELD_PASSWORD.into(),
                label: "Fedora password".into(),
                placeholder: None,
                field_type: UserFieldType::Secret,
            },
        ],
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            expected: "a boolean",
            value: value.to_string(),
        }),
    }
}
