use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ContentAccessError, RestError};
use crate::source::{
    Access, AttachmentEntry, ClassCatalog, ClassDefinition, CommentEntry, DocumentSource,
    HistoryEntry, ObjectEntry, RcsVersion,
};

/// Fully materialized document, loadable from YAML or JSON.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    pub wiki: String,
    pub space: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
    pub version: RcsVersion,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub default_language: String,
    #[serde(default)]
    pub translations: Vec<String>,
    #[serde(default)]
    pub view_url: String,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub content_author: String,
    #[serde(default)]
    pub content_updated: i64,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub comments: Vec<CommentEntry>,
    #[serde(default)]
    pub attachments: Vec<AttachmentEntry>,
    #[serde(default)]
    pub objects: Vec<ObjectEntry>,
    #[serde(default)]
    pub classes: Vec<ClassDefinition>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl DocumentSnapshot {
    pub fn new(
        wiki: impl Into<String>,
        space: impl Into<String>,
        name: impl Into<String>,
        version: RcsVersion,
    ) -> Self {
        Self {
            wiki: wiki.into(),
            space: space.into(),
            name: name.into(),
            title: String::new(),
            version,
            language: String::new(),
            default_language: String::new(),
            translations: Vec::new(),
            view_url: String::new(),
            creator: String::new(),
            created: 0,
            content_author: String::new(),
            content_updated: 0,
            content: String::new(),
            parent: None,
            comments: Vec::new(),
            attachments: Vec::new(),
            objects: Vec::new(),
            classes: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Loads a `.json` file as JSON and anything else as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RestError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|err| RestError::Io(err).context(path.display()))?;
        let parsed = if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
            Self::from_json(&raw)
        } else {
            Self::from_yaml(&raw)
        };
        parsed.map_err(|err| err.context(path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self, RestError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, RestError> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl DocumentSource for DocumentSnapshot {
    fn wiki(&self) -> Access<String> {
        Ok(self.wiki.clone())
    }

    fn space(&self) -> Access<String> {
        Ok(self.space.clone())
    }

    fn name(&self) -> Access<String> {
        Ok(self.name.clone())
    }

    fn full_name(&self) -> Access<String> {
        Ok(format!("{}.{}", self.space, self.name))
    }

    fn prefixed_full_name(&self) -> Access<String> {
        Ok(format!("{}:{}.{}", self.wiki, self.space, self.name))
    }

    fn title(&self) -> Access<String> {
        Ok(self.title.clone())
    }

    fn version(&self) -> Access<RcsVersion> {
        Ok(self.version)
    }

    fn language(&self) -> Access<String> {
        Ok(self.language.clone())
    }

    fn default_language(&self) -> Access<String> {
        Ok(self.default_language.clone())
    }

    fn translations(&self) -> Access<Vec<String>> {
        Ok(self.translations.clone())
    }

    fn view_url(&self) -> Access<String> {
        Ok(self.view_url.clone())
    }

    fn creator(&self) -> Access<String> {
        Ok(self.creator.clone())
    }

    fn created(&self) -> Access<i64> {
        Ok(self.created)
    }

    fn content_author(&self) -> Access<String> {
        Ok(self.content_author.clone())
    }

    fn content_updated(&self) -> Access<i64> {
        Ok(self.content_updated)
    }

    fn content(&self) -> Access<String> {
        Ok(self.content.clone())
    }

    fn parent(&self) -> Access<Option<String>> {
        Ok(self.parent.clone())
    }

    fn comments(&self) -> Access<Vec<CommentEntry>> {
        Ok(self.comments.clone())
    }

    fn attachments(&self) -> Access<Vec<AttachmentEntry>> {
        Ok(self.attachments.clone())
    }

    fn objects(&self) -> Access<Vec<ObjectEntry>> {
        Ok(self.objects.clone())
    }
}

impl ClassCatalog for DocumentSnapshot {
    fn class(&self, name: &str) -> Access<ClassDefinition> {
        self.classes
            .iter()
            .find(|class| class.name == name)
            .cloned()
            .ok_or_else(|| ContentAccessError::new("class", format!("class `{name}` not found")))
    }
}
