//! Semantic paths and the Dublin Core elements they map to.
//!
//! A semantic path such as `fedora.subject` is a tag a template or blueprint
//! field may carry. Each accepted path maps to exactly one Dublin Core element
//! (`http://purl.org/dc/elements/1.1/`). The mapping is a closed enum so that
//! adding a path without a predicate is a compile error.

use std::str::FromStr;

use thiserror::Error;

/// Namespace of the Dublin Core Metadata Element Set, version 1.1.
pub const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";

/// A Dublin Core element used as a predicate in deposit metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DcElement {
    Title,
    Date,
    Creator,
    Subject,
    Description,
    Publisher,
    Contributor,
    Type,
    Format,
    Identifier,
    Source,
    Language,
    Relation,
    Coverage,
    Rights,
}

impl DcElement {
    /// Local name within the `dc:` namespace, e.g. `"creator"`.
    pub fn local_name(self) -> &'static str {
        match self {
            DcElement::Title => "title",
            DcElement::Date => "date",
            DcElement::Creator => "creator",
            DcElement::Subject => "subject",
            DcElement::Description => "description",
            DcElement::Publisher => "publisher",
            DcElement::Contributor => "contributor",
            DcElement::Type => "type",
            DcElement::Format => "format",
            DcElement::Identifier => "identifier",
            DcElement::Source => "source",
            DcElement::Language => "language",
            DcElement::Relation => "relation",
            DcElement::Coverage => "coverage",
            DcElement::Rights => "rights",
        }
    }

    /// Full predicate IRI, e.g. `http://purl.org/dc/elements/1.1/creator`.
    pub fn iri(self) -> String {
        format!("{DC_NAMESPACE}{}", self.local_name())
    }
}

/// Formats the element as its prefixed name (e.g. `"dc:creator"`).
impl std::fmt::Display for DcElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dc:{}", self.local_name())
    }
}

/// A semantic path the connector knows how to map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SemanticPath {
    Creator,
    Subject,
    Description,
    Publisher,
    Contributor,
    Type,
    Format,
    Identifier,
    Source,
    Language,
    Relation,
    Coverage,
    Rights,
}

impl SemanticPath {
    /// Every path, in canonical order.
    pub const ALL: [SemanticPath; 13] = [
        SemanticPath::Creator,
        SemanticPath::Subject,
        SemanticPath::Description,
        SemanticPath::Publisher,
        SemanticPath::Contributor,
        SemanticPath::Type,
        SemanticPath::Format,
        SemanticPath::Identifier,
        SemanticPath::Source,
        SemanticPath::Language,
        SemanticPath::Relation,
        SemanticPath::Coverage,
        SemanticPath::Rights,
    ];

    /// The tag string carried by fields, e.g. `"fedora.creator"`.
    pub fn as_str(self) -> &'static str {
        match self {
            SemanticPath::Creator => "fedora.creator",
            SemanticPath::Subject => "fedora.subject",
            SemanticPath::Description => "fedora.description",
            SemanticPath::Publisher => "fedora.publisher",
            SemanticPath::Contributor => "fedora.contributor",
            SemanticPath::Type => "fedora.type",
            SemanticPath::Format => "fedora.format",
            SemanticPath::Identifier => "fedora.identifier",
            SemanticPath::Source => "fedora.source",
            SemanticPath::Language => "fedora.language",
            SemanticPath::Relation => "fedora.relation",
            SemanticPath::Coverage => "fedora.coverage",
            SemanticPath::Rights => "fedora.rights",
        }
    }

    /// The predicate values tagged with this path are emitted under.
    pub fn element(self) -> DcElement {
        match self {
            SemanticPath::Creator => DcElement::Creator,
            SemanticPath::Subject => DcElement::Subject,
            SemanticPath::Description => DcElement::Description,
            SemanticPath::Publisher => DcElement::Publisher,
            SemanticPath::Contributor => DcElement::Contributor,
            SemanticPath::Type => DcElement::Type,
            SemanticPath::Format => DcElement::Format,
            SemanticPath::Identifier => DcElement::Identifier,
            SemanticPath::Source => DcElement::Source,
            SemanticPath::Language => DcElement::Language,
            SemanticPath::Relation => DcElement::Relation,
            SemanticPath::Coverage => DcElement::Coverage,
            SemanticPath::Rights => DcElement::Rights,
        }
    }
}

impl std::fmt::Display for SemanticPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a configured name is not one of the known semantic paths.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown semantic path {0:?}; expected one of fedora.creator, fedora.subject, \
         fedora.description, fedora.publisher, fedora.contributor, fedora.type, fedora.format, \
         fedora.identifier, fedora.source, fedora.language, fedora.relation, fedora.coverage, \
         fedora.rights")]
pub struct UnknownSemanticPath(pub String);

impl FromStr for SemanticPath {
    type Err = UnknownSemanticPath;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SemanticPath::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownSemanticPath(s.to_string()))
    }
}

/// The ordered allow-list of semantic paths the metadata builder honours.
///
/// Fields tagged with any other string contribute nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticsConfig {
    pub available: Vec<SemanticPath>,
}

impl SemanticsConfig {
    pub fn new(available: Vec<SemanticPath>) -> Self {
        Self { available }
    }

    /// Parse configured names, preserving order and dropping repeats.
    pub fn from_names<I, S>(names: I) -> Result<Self, UnknownSemanticPath>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut available = Vec::new();
        for name in names {
            let path: SemanticPath = name.as_ref().trim().parse()?;
            if !available.contains(&path) {
                available.push(path);
            }
        }
        Ok(Self { available })
    }

    pub fn accepts(&self, path: SemanticPath) -> bool {
        self.available.contains(&path)
    }
}

/// Accepts every known path.
impl Default for SemanticsConfig {
    fn default() -> Self {
        Self::new(SemanticPath::ALL.to_vec())
    }
}

// --- tests -------------------------------------------------------------------
