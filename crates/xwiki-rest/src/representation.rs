//! Output representations. Plain data: scalar fields plus the links computed
//! for them, in the order they were computed.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::link::Link;

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct XWikiRoot {
    pub version: String,
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub wiki: String,
    pub name: String,
    pub home: String,
    pub xwiki_url: String,
    pub number_of_pages: u32,
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Translations {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_translation: Option<String>,
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub id: String,
    pub full_name: String,
    pub wiki: String,
    pub space: String,
    pub name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub xwiki_url: String,
    pub translations: Translations,
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub full_name: String,
    pub wiki: String,
    pub space: String,
    pub name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub xwiki_url: String,
    pub version: String,
    pub major_version: u32,
    pub minor_version: u32,
    pub language: String,
    pub creator: String,
    pub created: i64,
    pub modifier: String,
    pub modified: i64,
    pub content: String,
    pub translations: Translations,
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub page_id: String,
    pub version: u32,
    pub minor_version: u32,
    pub modified: i64,
    pub modifier: String,
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// `wiki:space.page@filename`; absent on attachment-at-version views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub size: u64,
    pub version: String,
    pub page_version: String,
    pub mime_type: String,
    pub author: String,
    pub date: i64,
    pub xwiki_url: String,
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    pub value: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separators: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSummary {
    pub id: String,
    pub guid: String,
    pub class_name: String,
    pub number: u32,
    pub page_id: String,
    pub pretty_name: String,
    pub properties: Vec<Property>,
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub properties: Vec<Property>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub class_name: String,
    pub properties: Vec<ClassProperty>,
    pub links: Vec<Link>,
}
