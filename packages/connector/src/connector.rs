//! The host-facing connector.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use fedora_deposit::MetadataBuilder;
use fedora_deposit_api::{DepositConfiguration, PlanDepositModel};
use reqwest::Client;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::client::FedoraClient;
use crate::config::FedoraSettings;
use crate::credentials::{self, CredentialCache};
use crate::deposit::DepositRun;
use crate::error::{ConnectorError, DepositError};
use crate::storage::FileStorage;

/// Deposits plans into one Fedora repository.
///
/// Holds no per-call state: credentials are resolved for every call, and
/// the only cached value is the logo. One instance can serve concurrent
/// deposits.
pub struct FedoraConnector {
    settings: FedoraSettings,
    storage: Arc<dyn FileStorage>,
    http: Client,
    builder: MetadataBuilder,
    logo: OnceCell<String>,
}

impl FedoraConnector {
    /// Fails only when the HTTP client cannot be constructed.
    pub fn new(
        settings: FedoraSettings,
        storage: Arc<dyn FileStorage>,
    ) -> Result<Self, ConnectorError> {
        let http = Client::builder().timeout(settings.timeout).build()?;
        let builder = MetadataBuilder::new(settings.domain.clone(), settings.semantics.clone());
        Ok(Self {
            settings,
            storage,
            http,
            builder,
            logo: OnceCell::new(),
        })
    }

    pub fn metadata_builder(&self) -> &MetadataBuilder {
        &self.builder
    }

    pub fn configuration(&self) -> Option<&DepositConfiguration> {
        self.settings.deposit_configuration.as_ref()
    }

    /// Fedora uses Basic authentication only; there is no code exchange.
    pub fn authenticate(&self, _code: &str) -> Option<String> {
        None
    }

    /// The configured logo as base64, read once and cached.
    ///
    /// `Ok(None)` unless the deposit configuration declares `has_logo`. A
    /// missing or non-file path also yields `Ok(None)` and is checked again on
    /// the next call. A read failure on an existing file is an error.
    pub async fn logo(&self) -> Result<Option<String>, ConnectorError> {
        if !self.configuration().is_some_and(|c| c.has_logo) {
            return Ok(None);
        }
        if let Some(cached) = self.logo.get() {
            return Ok(Some(cached.clone()));
        }
        let Some(path) = self.settings.logo.as_ref() else {
            return Ok(None);
        };

        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => {}
            _ => {
                warn!(path = %path.display(), "logo is not readable");
                return Ok(None);
            }
        }

        let encoded = self
            .logo
            .get_or_try_init(|| async {
                let bytes = tokio::fs::read(path).await.map_err(|source| ConnectorError::Logo {
                    path: path.clone(),
                    source,
                })?;
                Ok::<_, ConnectorError>(STANDARD.encode(bytes))
            })
            .await?;
        Ok(Some(encoded.clone()))
    }

    /// Deposit the plan in `model`, returning the repository identifier.
    ///
    /// Returns `Ok(None)` when the connector has no deposit configuration or
    /// the model carries no plan. Credentials come from the model's auth
    /// fields, else the configured defaults.
    pub async fn deposit(&self, model: &PlanDepositModel) -> Result<Option<String>, DepositError> {
        self.deposit_with(model, None).await
    }

    /// Like [`deposit`](Self::deposit), remembering explicit credentials in
    /// `cache` and falling back to them on later calls.
    pub async fn deposit_in_session(
        &self,
        model: &PlanDepositModel,
        cache: &mut CredentialCache,
    ) -> Result<Option<String>, DepositError> {
        self.deposit_with(model, Some(cache)).await
    }

    async fn deposit_with(
        &self,
        model: &PlanDepositModel,
        cache: Option<&mut CredentialCache>,
    ) -> Result<Option<String>, DepositError> {
        let Some(configuration) = self.configuration() else {
            debug!("no deposit configuration; nothing deposited");
            return Ok(None);
        };
        let Some(plan) = model.plan_model.as_ref() else {
            debug!("deposit model carries no plan; nothing deposited");
            return Ok(None);
        };

        let credentials = credentials::resolve(
            model.auth_info.as_ref(),
            cache,
            &self.settings.default_credentials,
        );
        let turtle = self.builder.build(plan)?;

        let run = DepositRun {
            client: FedoraClient::new(
                self.http.clone(),
                credentials,
                self.settings.max_in_memory_bytes,
            ),
            configuration,
            storage: self.storage.as_ref(),
        };
        run.run(plan, turtle).await.map(Some)
    }
}
