//! The deposit sequence for one plan.
//!
//! A plan without `previous_doi` becomes a new repository object:
//!
//! 1. `POST {base}` with the metadata Turtle
//! 2. `PUT {base}/{id}/{artifact}` for each artifact
//!
//! A plan with `previous_doi` becomes a new version of that object:
//!
//! 1. `POST {base}/{previous}/fcr:versions`
//! 2. `PUT {base}/{previous}` with fresh metadata
//! 3. `GET {base}/{previous}`, then `DELETE` every `ldp:contains` child
//! 4. `PUT {base}/{previous}/{artifact}` for each artifact
//!
//! The version sequence is not atomic. Every step is safe to repeat, so a
//! failed deposit is retried by running the whole call again.

use fedora_deposit::types::FileEnvelope;
use fedora_deposit::{clean_file_name, Plan};
use fedora_deposit_api::DepositConfiguration;
use tracing::{error, info, warn};

use crate::client::FedoraClient;
use crate::containment::child_uris;
use crate::error::DepositError;
use crate::handle::id_from_handle;
use crate::storage::FileStorage;

/// Everything one deposit call needs, borrowed from the connector.
pub(crate) struct DepositRun<'a> {
    pub client: FedoraClient,
    pub configuration: &'a DepositConfiguration,
    pub storage: &'a dyn FileStorage,
}

impl DepositRun<'_> {
    /// Deposit `plan` with its pre-built `turtle` metadata; returns the
    /// repository identifier.
    pub async fn run(&self, plan: &Plan, turtle: String) -> Result<String, DepositError> {
        match plan.previous_doi.as_deref().filter(|p| !p.trim().is_empty()) {
            None => self.deposit_new(plan, turtle).await,
            Some(previous) => self.deposit_version(plan, previous.trim(), turtle).await,
        }
    }

    async fn deposit_new(&self, plan: &Plan, turtle: String) -> Result<String, DepositError> {
        let base = self.configuration.base_url();
        let handle = self.client.create(&base, turtle).await?;
        let id = id_from_handle(&handle)?.to_string();

        let resource_uri = format!("{base}/{id}");
        self.upload_artifacts(plan, &resource_uri).await?;

        info!(plan = %plan.id, id = %id, "created repository object");
        Ok(id)
    }

    async fn deposit_version(
        &self,
        plan: &Plan,
        previous: &str,
        turtle: String,
    ) -> Result<String, DepositError> {
        let resource_uri = format!("{}/{previous}", self.configuration.base_url());

        self.client.create_version(&resource_uri).await?;
        self.client.replace(&resource_uri, turtle).await?;
        self.delete_children(&resource_uri).await?;
        self.upload_artifacts(plan, &resource_uri).await?;

        info!(plan = %plan.id, id = previous, version = plan.version, "versioned repository object");
        Ok(previous.to_string())
    }

    async fn delete_children(&self, resource_uri: &str) -> Result<(), DepositError> {
        let turtle = self.client.fetch_turtle(resource_uri).await?;
        if turtle.trim().is_empty() {
            warn!(resource_uri, "empty representation; no children to delete");
            return Ok(());
        }

        let children = match child_uris(&turtle, resource_uri) {
            Ok(children) => children,
            Err(e) => {
                warn!(resource_uri, error = %e, "could not read children; none deleted");
                return Ok(());
            }
        };

        for child in children {
            if let Err(e) = self.client.delete(&child).await {
                error!(child = %child, error = %e, "failed to delete child resource");
            }
        }
        Ok(())
    }

    async fn upload_artifacts(&self, plan: &Plan, resource_uri: &str) -> Result<(), DepositError> {
        for (kind, file) in plan.artifacts() {
            let Some(name) = file
                .filename
                .as_deref()
                .and_then(|n| clean_file_name(n, plan.version))
            else {
                warn!(%kind, "artifact has no file name; skipped");
                continue;
            };

            let Some(content) = self.content_of(file).await? else {
                warn!(%kind, %name, "artifact has no content; skipped");
                continue;
            };

            let url = format!("{resource_uri}/{name}");
            self.client.put_binary(&url, kind.content_type(), content).await?;
            info!(%kind, %url, "uploaded artifact");
        }
        Ok(())
    }

    /// Shared storage first when configured, else the inline bytes.
    async fn content_of(&self, file: &FileEnvelope) -> Result<Option<Vec<u8>>, DepositError> {
        if self.configuration.use_shared_storage {
            if let Some(file_ref) = file.file_ref.as_deref().filter(|r| !r.trim().is_empty()) {
                if let Some(bytes) = self.storage.read_file(file_ref).await? {
                    if !bytes.is_empty() {
                        return Ok(Some(bytes));
                    }
                }
            }
        }
        Ok(file.file.clone().filter(|bytes| !bytes.is_empty()))
    }
}

