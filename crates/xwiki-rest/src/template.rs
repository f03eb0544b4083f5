use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::TemplateError;

/// Closed vocabulary of template parameters.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum Param {
    #[serde(rename = "wikiName")]
    WikiName,
    #[serde(rename = "spaceName")]
    SpaceName,
    #[serde(rename = "pageName")]
    PageName,
    #[serde(rename = "version")]
    PageVersion,
    #[serde(rename = "languageId")]
    LanguageId,
    #[serde(rename = "className")]
    ClassName,
    #[serde(rename = "objectNumber")]
    ObjectNumber,
    #[serde(rename = "attachmentName")]
    AttachmentName,
    #[serde(rename = "attachmentVersion")]
    AttachmentVersion,
    #[serde(rename = "commentId")]
    CommentId,
}

impl Param {
    pub const ALL: [Param; 10] = [
        Param::WikiName,
        Param::SpaceName,
        Param::PageName,
        Param::PageVersion,
        Param::LanguageId,
        Param::ClassName,
        Param::ObjectNumber,
        Param::AttachmentName,
        Param::AttachmentVersion,
        Param::CommentId,
    ];

    /// Placeholder name as it appears between braces in a pattern.
    pub fn as_str(self) -> &'static str {
        match self {
            Param::WikiName => "wikiName",
            Param::SpaceName => "spaceName",
            Param::PageName => "pageName",
            Param::PageVersion => "version",
            Param::LanguageId => "languageId",
            Param::ClassName => "className",
            Param::ObjectNumber => "objectNumber",
            Param::AttachmentName => "attachmentName",
            Param::AttachmentVersion => "attachmentVersion",
            Param::CommentId => "commentId",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Param {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Param::ALL
            .into_iter()
            .find(|param| param.as_str() == value)
            .ok_or(())
    }
}

/// Parameter values for a single substitution, built fresh per link.
///
/// Values are inserted verbatim; callers supply path-segment-safe strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Parameters {
    values: BTreeMap<Param, String>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, param: Param, value: impl Into<String>) -> Self {
        self.values.insert(param, value.into());
        self
    }

    pub fn insert(&mut self, param: Param, value: impl Into<String>) {
        self.values.insert(param, value.into());
    }

    pub fn get(&self, param: Param) -> Option<&str> {
        self.values.get(&param).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(Param),
}

/// Immutable URI pattern with `{name}` placeholders drawn from [`Param`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UriTemplate {
    pattern: String,
    segments: Vec<Segment>,
}

impl UriTemplate {
    /// Parses `pattern`, rejecting placeholders outside the parameter vocabulary.
    pub fn parse(pattern: impl Into<String>) -> Result<Self, TemplateError> {
        static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
        let re = PLACEHOLDER.get_or_init(|| {
            Regex::new(r"\{([^{}]*)\}").expect("Invalid placeholder regex")
        });

        let pattern = pattern.into();
        let mut segments = Vec::new();
        let mut cursor = 0;

        for captures in re.captures_iter(&pattern) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            push_literal(&mut segments, &pattern, cursor, whole.start())?;
            let param = name
                .as_str()
                .parse::<Param>()
                .map_err(|_| TemplateError::UnknownPlaceholder {
                    placeholder: name.as_str().to_string(),
                    pattern: pattern.clone(),
                })?;
            segments.push(Segment::Placeholder(param));
            cursor = whole.end();
        }
        push_literal(&mut segments, &pattern, cursor, pattern.len())?;

        Ok(Self { pattern, segments })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parameters referenced by the pattern, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = Param> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(param) => Some(*param),
            Segment::Literal(_) => None,
        })
    }

    /// Substitutes every placeholder. Parameters the pattern does not reference
    /// are ignored; a referenced parameter that is absent fails the whole call.
    pub fn resolve(&self, parameters: &Parameters) -> Result<String, TemplateError> {
        let mut resolved = String::with_capacity(self.pattern.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => resolved.push_str(text),
                Segment::Placeholder(param) => {
                    let value = parameters.get(*param).ok_or_else(|| {
                        TemplateError::UnresolvedPlaceholder {
                            placeholder: param.as_str().to_string(),
                            pattern: self.pattern.clone(),
                        }
                    })?;
                    resolved.push_str(value);
                }
            }
        }
        Ok(resolved)
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

fn push_literal(
    segments: &mut Vec<Segment>,
    pattern: &str,
    start: usize,
    end: usize,
) -> Result<(), TemplateError> {
    let literal = &pattern[start..end];
    if literal.contains(['{', '}']) {
        return Err(TemplateError::Unbalanced {
            pattern: pattern.to_string(),
        });
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal.to_string()));
    }
    Ok(())
}
