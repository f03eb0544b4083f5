//! Read-only view of the content model that representations are assembled from.
//!
//! Every accessor is fallible: a backing store may refuse or fail to produce a
//! field, and assemblers abandon the whole build when that happens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ContentAccessError;

pub mod snapshot;

pub use snapshot::DocumentSnapshot;

pub type Access<T> = Result<T, ContentAccessError>;

/// A `(major, minor)` revision pair. Rendered as `"{major}.{minor}"` in URIs.
#[derive(
    Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(try_from = "String", into = "String")]
pub struct RcsVersion {
    pub major: u32,
    pub minor: u32,
}

impl RcsVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for RcsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for RcsVersion {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (major, minor) = value
            .split_once('.')
            .ok_or_else(|| format!("version `{value}` is not of the form major.minor"))?;
        let major = major
            .parse()
            .map_err(|_| format!("invalid major version in `{value}`"))?;
        let minor = minor
            .parse()
            .map_err(|_| format!("invalid minor version in `{value}`"))?;
        Ok(Self { major, minor })
    }
}

impl TryFrom<String> for RcsVersion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RcsVersion> for String {
    fn from(value: RcsVersion) -> Self {
        value.to_string()
    }
}

/// `space.page` reference, as used by parent pointers and history rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageReference {
    pub space: String,
    pub page: String,
}

impl PageReference {
    /// Splits on the first `.`; `None` when there is no separator or either
    /// side is empty.
    pub fn parse(reference: &str) -> Option<Self> {
        let (space, page) = reference.split_once('.')?;
        if space.is_empty() || page.is_empty() {
            return None;
        }
        Some(Self {
            space: space.to_string(),
            page: page.to_string(),
        })
    }
}

/// Raw value held by an object property.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PropertyValue {
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl PropertyValue {
    /// Form-field encoding: list items joined by `|`.
    pub fn form_string(&self) -> String {
        match self {
            PropertyValue::List(items) => items.join("|"),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Integer(value) => write!(f, "{value}"),
            PropertyValue::Float(value) => write!(f, "{value}"),
            PropertyValue::Text(value) => f.write_str(value),
            PropertyValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PropertyEntry {
    pub name: String,
    #[serde(default)]
    pub value: Option<PropertyValue>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentEntry {
    pub number: u32,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub date: Option<i64>,
    #[serde(default)]
    pub highlight: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentEntry {
    pub filename: String,
    pub size: u64,
    pub version: String,
    pub mime_type: String,
    pub author: String,
    pub date: i64,
    #[serde(default)]
    pub url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectEntry {
    pub guid: String,
    pub class_name: String,
    pub number: u32,
    #[serde(default)]
    pub pretty_name: String,
    #[serde(default)]
    pub properties: Vec<PropertyEntry>,
}

/// Declared kind of a class property, with the metadata specific to it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PropertyKind {
    List {
        class_type: String,
        #[serde(default)]
        allowed_values: Vec<String>,
        #[serde(default)]
        separators: String,
    },
    Date {
        date_format: String,
    },
    Scalar {
        class_type: String,
    },
}

impl PropertyKind {
    pub fn class_type(&self) -> &str {
        match self {
            PropertyKind::List { class_type, .. } | PropertyKind::Scalar { class_type } => {
                class_type
            }
            PropertyKind::Date { .. } => "Date",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClassPropertyDefinition {
    pub name: String,
    pub kind: PropertyKind,
    /// The definition's own settings (pretty name, size, ...).
    #[serde(default)]
    pub meta: Vec<PropertyEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClassDefinition {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<ClassPropertyDefinition>,
}

impl ClassDefinition {
    pub fn property(&self, name: &str) -> Option<&ClassPropertyDefinition> {
        self.properties.iter().find(|property| property.name == name)
    }
}

/// One row of a page's revision history.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub page_id: String,
    pub version: RcsVersion,
    pub modified: i64,
    pub modifier: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SpaceEntry {
    pub wiki: String,
    pub name: String,
    pub home: String,
    #[serde(default)]
    pub home_url: String,
    #[serde(default)]
    pub page_count: u32,
}

/// Accessors a wiki document exposes to the assemblers.
pub trait DocumentSource {
    fn wiki(&self) -> Access<String>;
    fn space(&self) -> Access<String>;
    fn name(&self) -> Access<String>;
    /// `space.page`
    fn full_name(&self) -> Access<String>;
    /// `wiki:space.page`
    fn prefixed_full_name(&self) -> Access<String>;
    fn title(&self) -> Access<String>;
    fn version(&self) -> Access<RcsVersion>;
    fn language(&self) -> Access<String>;
    fn default_language(&self) -> Access<String>;
    fn translations(&self) -> Access<Vec<String>>;
    fn view_url(&self) -> Access<String>;
    fn creator(&self) -> Access<String>;
    fn created(&self) -> Access<i64>;
    fn content_author(&self) -> Access<String>;
    fn content_updated(&self) -> Access<i64>;
    fn content(&self) -> Access<String>;
    fn parent(&self) -> Access<Option<String>>;
    fn comments(&self) -> Access<Vec<CommentEntry>>;
    fn attachments(&self) -> Access<Vec<AttachmentEntry>>;
    fn objects(&self) -> Access<Vec<ObjectEntry>>;
}

/// Resolves class definitions for type-aware object assembly.
pub trait ClassCatalog {
    fn class(&self, name: &str) -> Access<ClassDefinition>;
}
