use std::fmt;

use thiserror::Error;

use crate::registry::ResourceType;

/// Failures raised while building or resolving a URI template.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("placeholder {{{placeholder}}} in `{pattern}` has no parameter")]
    UnresolvedPlaceholder { placeholder: String, pattern: String },
    #[error("placeholder {{{placeholder}}} in `{pattern}` is not a recognized parameter")]
    UnknownPlaceholder { placeholder: String, pattern: String },
    #[error("unbalanced braces in `{pattern}`")]
    Unbalanced { pattern: String },
}

/// Failures raised while assembling a resource registry from a table.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("resource table is missing: {}", join_types(.0))]
    Missing(Vec<ResourceType>),
    #[error("invalid pattern for {resource}: {source}")]
    Template {
        resource: ResourceType,
        #[source]
        source: TemplateError,
    },
    #[error("unknown resource type: {0}")]
    UnknownResource(String),
}

fn join_types(types: &[ResourceType]) -> String {
    types
        .iter()
        .map(|ty| ty.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Raised by a source accessor when the backing entity cannot supply a field.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("cannot read {field}: {reason}")]
pub struct ContentAccessError {
    pub field: String,
    pub reason: String,
}

impl ContentAccessError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Typed outcome of a representation build that could not complete.
///
/// `Unavailable`, `PropertyTypeNotFound` and `MalformedReference` describe the
/// entity and should be reported as "entity unavailable". `Link` means the
/// registry and the assembler disagree about a template and is a server fault.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("entity unavailable: {0}")]
    Unavailable(#[from] ContentAccessError),
    #[error("no property definition for `{property}` in class `{class}`")]
    PropertyTypeNotFound { class: String, property: String },
    #[error("malformed page reference `{0}`")]
    MalformedReference(String),
    #[error(transparent)]
    Link(#[from] TemplateError),
}

impl BuildError {
    /// Whether the failure stems from the entity rather than from the registry.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, BuildError::Link(_))
    }
}

/// High-level error type shared across the crate's configuration surface.
#[derive(Debug, Error)]
pub enum RestError {
    #[error("config error: {0}")]
    Config(String),
    #[error("invalid root reference: {0}")]
    InvalidRoot(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for RestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for RestError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl RestError {
    pub fn context<T: fmt::Display>(self, ctx: T) -> Self {
        match self {
            RestError::Config(msg) => RestError::Config(format!("{ctx}: {msg}")),
            RestError::InvalidRoot(msg) => RestError::InvalidRoot(format!("{ctx}: {msg}")),
            RestError::Serialization(msg) => RestError::Serialization(format!("{ctx}: {msg}")),
            RestError::Registry(err) => RestError::Config(format!("{ctx}: {err}")),
            RestError::Build(err) => RestError::Build(err),
            RestError::Io(err) => {
                RestError::Io(std::io::Error::new(err.kind(), format!("{ctx}: {err}")))
            }
        }
    }
}
