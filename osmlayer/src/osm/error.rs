//! Error types for the feature graph builder.

use std::fmt;

use thiserror::Error;

use super::model::ElementKind;

/// Result type for feature graph operations.
pub type OsmResult<T> = Result<T, OsmError>;

/// Document-level failures. Only malformed XML aborts a build.
#[derive(Debug, Error)]
pub enum OsmError {
    /// The input is not well-formed XML.
    #[error("Malformed XML document: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Failed to read the input file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
}

/// Why a single entity was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityProblem {
    /// The `id` attribute is missing.
    MissingId,
    /// A required attribute is missing.
    MissingAttribute(&'static str),
    /// A coordinate attribute is not a finite number.
    MalformedCoordinate {
        /// Attribute name
        attribute: &'static str,
        /// Raw attribute text
        value: String,
    },
}

impl fmt::Display for EntityProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityProblem::MissingId => f.write_str("missing id attribute"),
            EntityProblem::MissingAttribute(name) => write!(f, "missing {} attribute", name),
            EntityProblem::MalformedCoordinate { attribute, value } => {
                write!(f, "malformed coordinate {}=\"{}\"", attribute, value)
            }
        }
    }
}

/// An entity that could not be built. The rest of the document is unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} {}: {problem}", .id.as_deref().unwrap_or("<no id>"))]
pub struct EntityError {
    /// Entity kind
    pub kind: ElementKind,
    /// Entity id when present
    pub id: Option<String>,
    /// What was wrong
    pub problem: EntityProblem,
}
