//! Host-facing types for the Fedora deposit connector.
//!
//! A host platform drives the connector through four calls: `deposit`,
//! `configuration`, `authenticate` and `logo`. This crate holds the values
//! that cross that boundary, plus the structured error body the repository
//! returns when it rejects a request.
//!
//! | Type | Used by |
//! |------|---------|
//! | [`DepositConfiguration`] | `configuration()` result; gates `deposit` |
//! | [`PlanDepositModel`] | `deposit()` argument: plan plus optional auth fields |
//! | [`RepositoryErrorBody`] | parsed from 4xx/5xx repository responses |

pub mod configuration;
pub mod error;
pub mod request;

pub use configuration::{DepositConfiguration, DepositType, UserConfigurationField, UserFieldType};
pub use error::RepositoryErrorBody;
pub use request::{AuthInfo, PlanDepositModel, PluginUserField, FIELD_PASSWORD, FIELD_USERNAME};
