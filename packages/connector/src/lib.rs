//! Fedora Commons deposit connector.
//!
//! Takes a plan from the host platform, turns it into Dublin Core metadata
//! and writes it, together with the plan's exported artifacts, into a
//! Fedora repository over its REST API.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`connector`] | [`FedoraConnector`]: `deposit`, `configuration`, `authenticate`, `logo` |
//! | [`config`] | [`FedoraSettings`] read from `FEDORA_*` environment variables |
//! | [`credentials`] | Per-call credential resolution and the optional session cache |
//! | [`client`] | [`FedoraClient`]: one method per repository request |
//! | `deposit` | The new-object and new-version sequences |
//! | [`containment`] | `ldp:contains` children from a Turtle representation |
//! | [`handle`] | Identifier extraction from creation responses |
//! | [`storage`] | [`FileStorage`] trait with local-directory and in-memory readers |
//! | [`error`] | [`FedoraError`], [`DepositError`], [`ConnectorError`] |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fedora_deposit_connector::{FedoraConnector, FedoraSettings, LocalFileStorage};
//!
//! let settings = FedoraSettings::from_env()?;
//! let storage = Arc::new(LocalFileStorage::new(&settings.storage_dir));
//! let connector = FedoraConnector::new(settings, storage)?;
//! let id = connector.deposit(&model).await?;
//! ```

pub mod client;
pub mod config;
pub mod connector;
pub mod containment;
pub mod credentials;
mod deposit;
pub mod error;
pub mod handle;
pub mod storage;

pub use client::FedoraClient;
pub use config::{ConfigError, FedoraSettings};
pub use connector::FedoraConnector;
pub use credentials::{CredentialCache, Credentials};
pub use error::{ConnectorError, DepositError, FedoraError};
pub use storage::local::LocalFileStorage;
pub use storage::memory::MemoryFileStorage;
pub use storage::{FileStorage, StorageError};
