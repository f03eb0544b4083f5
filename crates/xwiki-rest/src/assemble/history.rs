use crate::assemble::{log_abandoned, versioned_page_parameters};
use crate::error::BuildError;
use crate::link::{LinkResolver, Relation};
use crate::registry::ResourceType;
use crate::representation::HistorySummary;
use crate::source::{HistoryEntry, PageReference};
use crate::template::Param;

/// One history row. With `language` the `page` link targets that translation's
/// revision, otherwise the page revision.
pub fn history_summary(
    links: &LinkResolver<'_>,
    wiki: &str,
    language: Option<&str>,
    entry: &HistoryEntry,
) -> Result<HistorySummary, BuildError> {
    build_history_summary(links, wiki, language, entry).inspect_err(log_abandoned("history"))
}

fn build_history_summary(
    links: &LinkResolver<'_>,
    wiki: &str,
    language: Option<&str>,
    entry: &HistoryEntry,
) -> Result<HistorySummary, BuildError> {
    let reference = PageReference::parse(&entry.page_id)
        .ok_or_else(|| BuildError::MalformedReference(entry.page_id.clone()))?;

    let mut params =
        versioned_page_parameters(wiki, &reference.space, &reference.page, entry.version);
    let ty = match language {
        Some(language) => {
            params.insert(Param::LanguageId, language);
            ResourceType::PageTranslationVersion
        }
        None => ResourceType::PageVersion,
    };
    let link = links.link(ty, &params, Relation::Page)?;

    Ok(HistorySummary {
        page_id: entry.page_id.clone(),
        version: entry.version.major,
        minor_version: entry.version.minor,
        modified: entry.modified,
        modifier: entry.modifier.clone(),
        links: vec![link],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::harness::{Harness, href};
    use crate::source::RcsVersion;

    fn entry(page_id: &str) -> HistoryEntry {
        HistoryEntry {
            page_id: page_id.into(),
            version: RcsVersion::new(3, 2),
            modified: 1_700_000_000_000,
            modifier: "XWiki.Admin".into(),
        }
    }

    #[test]
    fn page_revision_without_language() {
        let harness = Harness::new();
        let summary = history_summary(&harness.links(), "xwiki", None, &entry("Main.WebHome"))
            .unwrap();

        assert_eq!((summary.version, summary.minor_version), (3, 2));
        assert_eq!(summary.modifier, "XWiki.Admin");
        assert_eq!(summary.links.len(), 1);
        assert_eq!(summary.links[0].rel, Relation::Page);
        assert_eq!(
            summary.links[0].href,
            href("/wikis/xwiki/spaces/Main/pages/WebHome/history/3.2")
        );
    }

    #[test]
    fn translation_revision_with_language() {
        let harness = Harness::new();
        let summary =
            history_summary(&harness.links(), "xwiki", Some("fr"), &entry("Main.WebHome"))
                .unwrap();

        assert_eq!(summary.links.len(), 1);
        assert_eq!(
            summary.links[0].href,
            href("/wikis/xwiki/spaces/Main/pages/WebHome/translations/fr/history/3.2")
        );
    }

    #[test]
    fn page_id_without_separator_is_rejected() {
        let harness = Harness::new();
        let err = history_summary(&harness.links(), "xwiki", None, &entry("WebHome")).unwrap_err();
        assert_eq!(err, BuildError::MalformedReference("WebHome".into()));
        assert!(err.is_unavailable());
    }
}
