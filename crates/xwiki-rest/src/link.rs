use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{RestError, TemplateError};
use crate::registry::{ResourceRegistry, ResourceType};
use crate::template::{Param, Parameters};

/// Media type advertised on the `wadl` link of the root representation.
pub const WADL_MEDIA_TYPE: &str = "application/vnd.sun.wadl+xml";

/// Semantic role of a link relative to its owning representation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Relation {
    #[serde(rename = "self")]
    SelfRef,
    Page,
    Space,
    Pages,
    Translation,
    Parent,
    History,
    Comments,
    Attachments,
    Objects,
    AttachmentData,
    Wadl,
    Wikis,
}

impl Relation {
    pub fn as_str(self) -> &'static str {
        match self {
            Relation::SelfRef => "self",
            Relation::Page => "page",
            Relation::Space => "space",
            Relation::Pages => "pages",
            Relation::Translation => "translation",
            Relation::Parent => "parent",
            Relation::History => "history",
            Relation::Comments => "comments",
            Relation::Attachments => "attachments",
            Relation::Objects => "objects",
            Relation::AttachmentData => "attachment-data",
            Relation::Wadl => "wadl",
            Relation::Wikis => "wikis",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed hypermedia link. Owned by exactly one representation.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub href: String,
    pub rel: Relation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href_lang: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl Link {
    pub fn new(href: impl Into<String>, rel: Relation) -> Self {
        Self {
            href: href.into(),
            rel,
            href_lang: None,
            media_type: None,
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }
}

/// Scheme, host and base path every generated URI is prefixed with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootReference(String);

impl RootReference {
    /// Accepts an absolute `http`/`https` URL without query or fragment.
    /// Trailing slashes are dropped so patterns can start with `/`.
    pub fn parse(raw: &str) -> Result<Self, RestError> {
        let url = Url::parse(raw.trim())
            .map_err(|err| RestError::InvalidRoot(format!("{raw}: {err}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RestError::InvalidRoot(format!(
                "{raw}: scheme must be http or https"
            )));
        }
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(RestError::InvalidRoot(format!("{raw}: missing host")));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(RestError::InvalidRoot(format!(
                "{raw}: query and fragment are not allowed"
            )));
        }
        Ok(Self(url.as_str().trim_end_matches('/').to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RootReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns `(resource type, parameters)` into absolute links.
///
/// Borrows the registry; both the resolver and the registry are read-only, so a
/// resolver can be created per request or shared across threads.
#[derive(Clone, Copy, Debug)]
pub struct LinkResolver<'a> {
    root: &'a RootReference,
    registry: &'a ResourceRegistry,
}

impl<'a> LinkResolver<'a> {
    pub fn new(root: &'a RootReference, registry: &'a ResourceRegistry) -> Self {
        Self { root, registry }
    }

    pub fn root(&self) -> &RootReference {
        self.root
    }

    pub fn registry(&self) -> &ResourceRegistry {
        self.registry
    }

    /// Absolute URI for `ty` with `parameters` substituted.
    pub fn uri(&self, ty: ResourceType, parameters: &Parameters) -> Result<String, TemplateError> {
        let path = self.registry.template_for(ty).resolve(parameters)?;
        Ok(format!("{}{}", self.root, path))
    }

    /// Builds a link; translation links also carry the language they point at.
    pub fn link(
        &self,
        ty: ResourceType,
        parameters: &Parameters,
        rel: Relation,
    ) -> Result<Link, TemplateError> {
        let href = self.uri(ty, parameters)?;
        tracing::trace!(resource = %ty, rel = %rel, %href, "resolved link");
        let mut link = Link::new(href, rel);
        if rel == Relation::Translation {
            link.href_lang = parameters.get(Param::LanguageId).map(str::to_string);
        }
        Ok(link)
    }
}
