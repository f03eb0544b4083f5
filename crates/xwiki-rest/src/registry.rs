use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, RestError};
use crate::template::UriTemplate;

/// Abstract identifier for each addressable resource shape.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceType {
    Root,
    Wikis,
    Spaces,
    Space,
    Pages,
    Page,
    PageHistory,
    PageVersion,
    PageTranslations,
    PageTranslation,
    PageTranslationHistory,
    PageTranslationVersion,
    Comments,
    Comment,
    CommentsAtVersion,
    CommentAtVersion,
    Attachments,
    Attachment,
    AttachmentHistory,
    AttachmentVersion,
    AttachmentsAtVersion,
    AttachmentAtVersion,
    Objects,
    Object,
    Classes,
    Class,
}

impl ResourceType {
    pub const ALL: [ResourceType; 26] = [
        ResourceType::Root,
        ResourceType::Wikis,
        ResourceType::Spaces,
        ResourceType::Space,
        ResourceType::Pages,
        ResourceType::Page,
        ResourceType::PageHistory,
        ResourceType::PageVersion,
        ResourceType::PageTranslations,
        ResourceType::PageTranslation,
        ResourceType::PageTranslationHistory,
        ResourceType::PageTranslationVersion,
        ResourceType::Comments,
        ResourceType::Comment,
        ResourceType::CommentsAtVersion,
        ResourceType::CommentAtVersion,
        ResourceType::Attachments,
        ResourceType::Attachment,
        ResourceType::AttachmentHistory,
        ResourceType::AttachmentVersion,
        ResourceType::AttachmentsAtVersion,
        ResourceType::AttachmentAtVersion,
        ResourceType::Objects,
        ResourceType::Object,
        ResourceType::Classes,
        ResourceType::Class,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Root => "root",
            ResourceType::Wikis => "wikis",
            ResourceType::Spaces => "spaces",
            ResourceType::Space => "space",
            ResourceType::Pages => "pages",
            ResourceType::Page => "page",
            ResourceType::PageHistory => "page-history",
            ResourceType::PageVersion => "page-version",
            ResourceType::PageTranslations => "page-translations",
            ResourceType::PageTranslation => "page-translation",
            ResourceType::PageTranslationHistory => "page-translation-history",
            ResourceType::PageTranslationVersion => "page-translation-version",
            ResourceType::Comments => "comments",
            ResourceType::Comment => "comment",
            ResourceType::CommentsAtVersion => "comments-at-version",
            ResourceType::CommentAtVersion => "comment-at-version",
            ResourceType::Attachments => "attachments",
            ResourceType::Attachment => "attachment",
            ResourceType::AttachmentHistory => "attachment-history",
            ResourceType::AttachmentVersion => "attachment-version",
            ResourceType::AttachmentsAtVersion => "attachments-at-version",
            ResourceType::AttachmentAtVersion => "attachment-at-version",
            ResourceType::Objects => "objects",
            ResourceType::Object => "object",
            ResourceType::Classes => "classes",
            ResourceType::Class => "class",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = RegistryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == value)
            .ok_or_else(|| RegistryError::UnknownResource(value.to_string()))
    }
}

const PAGE: &str = "/wikis/{wikiName}/spaces/{spaceName}/pages/{pageName}";

/// Built-in resource table.
pub fn standard_table() -> BTreeMap<ResourceType, String> {
    let page = |suffix: &str| format!("{PAGE}{suffix}");
    BTreeMap::from([
        (ResourceType::Root, "/".to_string()),
        (ResourceType::Wikis, "/wikis".to_string()),
        (ResourceType::Spaces, "/wikis/{wikiName}/spaces".to_string()),
        (
            ResourceType::Space,
            "/wikis/{wikiName}/spaces/{spaceName}".to_string(),
        ),
        (
            ResourceType::Pages,
            "/wikis/{wikiName}/spaces/{spaceName}/pages".to_string(),
        ),
        (ResourceType::Page, page("")),
        (ResourceType::PageHistory, page("/history")),
        (ResourceType::PageVersion, page("/history/{version}")),
        (ResourceType::PageTranslations, page("/translations")),
        (ResourceType::PageTranslation, page("/translations/{languageId}")),
        (
            ResourceType::PageTranslationHistory,
            page("/translations/{languageId}/history"),
        ),
        (
            ResourceType::PageTranslationVersion,
            page("/translations/{languageId}/history/{version}"),
        ),
        (ResourceType::Comments, page("/comments")),
        (ResourceType::Comment, page("/comments/{commentId}")),
        (
            ResourceType::CommentsAtVersion,
            page("/history/{version}/comments"),
        ),
        (
            ResourceType::CommentAtVersion,
            page("/history/{version}/comments/{commentId}"),
        ),
        (ResourceType::Attachments, page("/attachments")),
        (ResourceType::Attachment, page("/attachments/{attachmentName}")),
        (
            ResourceType::AttachmentHistory,
            page("/attachments/{attachmentName}/history"),
        ),
        (
            ResourceType::AttachmentVersion,
            page("/attachments/{attachmentName}/history/{attachmentVersion}"),
        ),
        (
            ResourceType::AttachmentsAtVersion,
            page("/history/{version}/attachments"),
        ),
        (
            ResourceType::AttachmentAtVersion,
            page("/history/{version}/attachments/{attachmentName}"),
        ),
        (ResourceType::Objects, page("/objects")),
        (ResourceType::Object, page("/objects/{className}/{objectNumber}")),
        (ResourceType::Classes, "/wikis/{wikiName}/classes".to_string()),
        (
            ResourceType::Class,
            "/wikis/{wikiName}/classes/{className}".to_string(),
        ),
    ])
}

/// Read-only mapping from resource type to URI template.
///
/// Only [`RegistryBuilder::build`] produces a registry, and it refuses tables that
/// leave any [`ResourceType`] unregistered, so lookups never miss afterwards.
/// Construct one at startup and share it by reference.
#[derive(Clone, Debug)]
pub struct ResourceRegistry {
    templates: BTreeMap<ResourceType, UriTemplate>,
}

impl ResourceRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry populated from [`standard_table`].
    pub fn standard() -> Result<Self, RegistryError> {
        Self::from_table(standard_table())
    }

    pub fn from_table(table: BTreeMap<ResourceType, String>) -> Result<Self, RegistryError> {
        table
            .into_iter()
            .fold(Self::builder(), |builder, (ty, pattern)| {
                builder.register(ty, pattern)
            })
            .build()
    }

    /// Template registered for `ty`.
    ///
    /// # Panics
    ///
    /// Panics if `ty` is not registered, which `build` rules out.
    pub fn template_for(&self, ty: ResourceType) -> &UriTemplate {
        match self.templates.get(&ty) {
            Some(template) => template,
            None => panic!("resource type `{ty}` is not registered"),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceType, &UriTemplate)> {
        self.templates.iter().map(|(ty, template)| (*ty, template))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Collects registrations and validates them all at once.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    patterns: BTreeMap<ResourceType, String>,
}

impl RegistryBuilder {
    /// Registers `pattern` for `ty`, replacing any earlier registration.
    pub fn register(mut self, ty: ResourceType, pattern: impl Into<String>) -> Self {
        self.patterns.insert(ty, pattern.into());
        self
    }

    pub fn build(self) -> Result<ResourceRegistry, RegistryError> {
        let missing: Vec<_> = ResourceType::ALL
            .into_iter()
            .filter(|ty| !self.patterns.contains_key(ty))
            .collect();
        if !missing.is_empty() {
            return Err(RegistryError::Missing(missing));
        }

        let mut templates = BTreeMap::new();
        for (ty, pattern) in self.patterns {
            let template = UriTemplate::parse(pattern)
                .map_err(|source| RegistryError::Template { resource: ty, source })?;
            templates.insert(ty, template);
        }

        tracing::debug!(resources = templates.len(), "resource registry built");
        Ok(ResourceRegistry { templates })
    }
}

/// Route overrides loaded from configuration, keyed by resource-type name.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct RouteTable {
    #[serde(default)]
    pub routes: BTreeMap<String, String>,
}

impl RouteTable {
    /// Reads a document of the form `routes: { page: "/..." }`, as JSON when
    /// the file ends in `.json` and as YAML otherwise.
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

    /// Merges the overrides over [`standard_table`] and builds the registry.
    pub fn into_registry(self) -> Result<ResourceRegistry, RegistryError> {
        let mut table = standard_table();
        for (name, pattern) in self.routes {
            table.insert(name.parse()?, pattern);
        }
        ResourceRegistry::from_table(table)
    }
}
