//! Discovery of a resource's children from its Turtle representation.

use oxrdf::{NamedOrBlankNode, Term};
use oxrdfio::{RdfFormat, RdfParser};

/// `ldp:contains`, the containment predicate Fedora uses for child resources.
pub const LDP_CONTAINS: &str = "http://www.w3.org/ns/ldp#contains";

/// Errors from reading a Turtle representation.
#[derive(Debug, thiserror::Error)]
pub enum ContainmentError {
    #[error("invalid base IRI {0:?}")]
    InvalidBase(String),

    #[error("failed to parse turtle: {0}")]
    Parse(String),
}

/// URIs of the resources `resource_uri` contains, in document order.
///
/// Relative IRIs resolve against `resource_uri`. A trailing `/` on either
/// side is ignored when matching the subject.
pub fn child_uris(turtle: &str, resource_uri: &str) -> Result<Vec<String>, ContainmentError> {
    let parser = RdfParser::from_format(RdfFormat::Turtle)
        .with_base_iri(resource_uri)
        .map_err(|_| ContainmentError::InvalidBase(resource_uri.to_string()))?;

    let target = resource_uri.trim_end_matches('/');
    let mut children = Vec::new();

    for quad in parser.for_reader(turtle.as_bytes()) {
        let quad = quad.map_err(|e| ContainmentError::Parse(e.to_string()))?;
        let is_target = matches!(
            &quad.subject,
            NamedOrBlankNode::NamedNode(s) if s.as_str().trim_end_matches('/') == target
        );
        if !is_target || quad.predicate.as_str() != LDP_CONTAINS {
            continue;
        }
        if let Term::NamedNode(child) = quad.object {
            let child = child.into_string();
            if !children.contains(&child) {
                children.push(child);
            }
        }
    }

    Ok(children)
}
