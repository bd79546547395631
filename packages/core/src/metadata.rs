//! Dublin Core metadata for a deposited plan.
//!
//! [`MetadataBuilder::build_graph`] assembles a [`ResourceGraph`]: a single
//! subject (the empty relative IRI `<>`, which the repository resolves to the
//! object's own URI) with one [`Statement`] per predicate/value pair.
//!
//! Statement order is only fixed for the leading block:
//!
//! 1. `dc:date` (deposit date) and `dc:title` (plan label)
//! 2. `dc:identifier` with the public browse URL, for public plans
//! 3. one `dc:creator` per plan user, repeats included
//!
//! The semantic statements that follow come from per-path value sets and
//! carry no order guarantee; each distinct value appears once per path.

use std::collections::{HashMap, HashSet};

use chrono::{Local, NaiveDate};
use oxrdf::{Literal, NamedNode, Triple};
use oxrdfio::{RdfFormat, RdfSerializer};
use thiserror::Error;

use crate::extract::{blueprint_values, description_values, fields_tagged};
use crate::semantics::{DcElement, SemanticPath, SemanticsConfig, DC_NAMESPACE};
use crate::types::{Plan, PlanAccessType};

/// Path under the platform domain where public plans are browsable.
pub const PUBLIC_PLAN_PATH: &str = "explore-plans/overview/public/";

/// Errors produced while serialising metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("turtle serialisation failed: {0}")]
    Serialization(String),
}

/// One `<> dc:element "value"` statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Statement {
    pub element: DcElement,
    pub value: String,
}

/// The in-memory RDF description of the deposit resource.
///
/// Statements are kept as a list, not a set: two plan users with the same
/// display name yield two `dc:creator` statements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceGraph {
    statements: Vec<Statement>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, element: DcElement, value: impl Into<String>) {
        self.statements.push(Statement {
            element,
            value: value.into(),
        });
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Values emitted under `element`, in emission order.
    pub fn values(&self, element: DcElement) -> Vec<&str> {
        self.statements
            .iter()
            .filter(|s| s.element == element)
            .map(|s| s.value.as_str())
            .collect()
    }

    /// Serialise as Turtle with a `dc:` prefix and `<>` as subject.
    pub fn to_turtle(&self) -> Result<String, MetadataError> {
        let subject = NamedNode::new_unchecked("");
        let mut serializer = RdfSerializer::from_format(RdfFormat::Turtle)
            .with_prefix("dc", DC_NAMESPACE)
            .map_err(|e| MetadataError::Serialization(e.to_string()))?
            .for_writer(Vec::new());

        for statement in &self.statements {
            let triple = Triple::new(
                subject.clone(),
                NamedNode::new_unchecked(statement.element.iri()),
                Literal::new_simple_literal(statement.value.as_str()),
            );
            serializer
                .serialize_triple(&triple)
                .map_err(|e: std::io::Error| MetadataError::Serialization(e.to_string()))?;
        }

        let buffer = serializer
            .finish()
            .map_err(|e: std::io::Error| MetadataError::Serialization(e.to_string()))?;
        String::from_utf8(buffer)
            .map_err(|e| MetadataError::Serialization(format!("invalid UTF-8 in output: {e}")))
    }
}

/// Builds deposit metadata from a plan.
#[derive(Debug, Clone)]
pub struct MetadataBuilder {
    domain: String,
    semantics: SemanticsConfig,
}

impl MetadataBuilder {
    /// `domain` is the platform's public base URL, e.g. `https://dmp.example.org/`.
    pub fn new(domain: impl Into<String>, semantics: SemanticsConfig) -> Self {
        Self {
            domain: domain.into(),
            semantics,
        }
    }

    pub fn semantics(&self) -> &SemanticsConfig {
        &self.semantics
    }

    /// Turtle metadata for `plan`, dated today in the local zone.
    pub fn build(&self, plan: &Plan) -> Result<String, MetadataError> {
        self.build_graph(plan, Local::now().date_naive()).to_turtle()
    }

    /// The statement graph for `plan` with `today` as deposit date.
    pub fn build_graph(&self, plan: &Plan, today: NaiveDate) -> ResourceGraph {
        let mut graph = ResourceGraph::new();

        graph.add(DcElement::Date, today.format("%Y-%m-%d").to_string());
        graph.add(DcElement::Title, plan.label.clone());

        if plan.access_type == PlanAccessType::Public {
            graph.add(DcElement::Identifier, self.public_url(plan));
        }

        for plan_user in &plan.users {
            graph.add(DcElement::Creator, plan_user.user.name.clone());
        }

        for (path, values) in self.semantic_values(plan) {
            for value in values {
                graph.add(path.element(), value);
            }
        }

        graph
    }

    /// `{domain}explore-plans/overview/public/{id}`
    pub fn public_url(&self, plan: &Plan) -> String {
        let domain = self.domain.trim_end_matches('/');
        format!("{domain}/{PUBLIC_PLAN_PATH}{}", plan.id)
    }

    // Union of description and blueprint values per accepted path.
    fn semantic_values(&self, plan: &Plan) -> HashMap<SemanticPath, HashSet<String>> {
        let mut by_path: HashMap<SemanticPath, HashSet<String>> = HashMap::new();

        for description in &plan.descriptions {
            let definition = &description.description_template.definition;
            for &path in &self.semantics.available {
                let fields = fields_tagged(definition, path);
                let values = description_values(&fields, description.properties.as_ref());
                by_path.entry(path).or_default().extend(values);
            }
        }

        for &path in &self.semantics.available {
            let values = blueprint_values(plan, path);
            if !values.is_empty() {
                by_path.entry(path).or_default().extend(values);
            }
        }

        by_path.retain(|_, values| !values.is_empty());
        by_path
    }
}

// --- tests -------------------------------------------------------------------
