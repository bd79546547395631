//! Metadata core for depositing data-management plans into a Fedora repository.
//!
//! This crate turns a plan into the RDF/Turtle document that becomes the
//! repository object's metadata, and computes the names under which the
//! plan's artifacts are uploaded. It performs no I/O; the
//! `fedora-deposit-connector` crate owns every network and filesystem call.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`types`] | Plan, description template and value data model |
//! | [`semantics`] | Closed mapping of `fedora.*` semantic paths to Dublin Core elements |
//! | [`extract`] | Per-field-type extraction of string values tagged with a semantic path |
//! | [`metadata`] | [`MetadataBuilder`] and the Turtle-serialisable [`ResourceGraph`] |
//! | [`naming`] | Version-stamped artifact file names |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use fedora_deposit::{MetadataBuilder, Plan, SemanticsConfig};
//!
//! let plan: Plan = serde_json::from_str(&json)?;
//! let builder = MetadataBuilder::new("https://dmp.example.org/", SemanticsConfig::default());
//! let turtle = builder.build(&plan)?;
//! ```

pub mod extract;
pub mod metadata;
pub mod naming;
pub mod semantics;
pub mod types;

pub use metadata::{MetadataBuilder, MetadataError, ResourceGraph, Statement};
pub use naming::clean_file_name;
pub use semantics::{DcElement, SemanticPath, SemanticsConfig, UnknownSemanticPath};
pub use types::{
    ArtifactKind, Description, FieldData, FileEnvelope, Plan, PlanAccessType, PlanUser,
};
