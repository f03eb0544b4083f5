use crate::assemble::{log_abandoned, page_parameters, pick, versioned_page_parameters};
use crate::error::BuildError;
use crate::link::{Link, LinkResolver, Relation};
use crate::registry::ResourceType;
use crate::representation::{Page, PageSummary, Translations};
use crate::source::{DocumentSource, PageReference};
use crate::template::{Param, Parameters};

/// Builds the page summary used in page listings.
pub fn page_summary<D>(links: &LinkResolver<'_>, doc: &D) -> Result<PageSummary, BuildError>
where
    D: DocumentSource + ?Sized,
{
    build_page_summary(links, doc).inspect_err(log_abandoned("page-summary"))
}

/// Builds the full page representation.
///
/// The `self` link is `request_uri` verbatim. With `use_version` set, the
/// translation, comments and attachments links address the page's current
/// revision instead of the latest one.
pub fn page<D>(
    links: &LinkResolver<'_>,
    doc: &D,
    request_uri: &str,
    use_version: bool,
) -> Result<Page, BuildError>
where
    D: DocumentSource + ?Sized,
{
    build_page(links, doc, request_uri, use_version).inspect_err(log_abandoned("page"))
}

fn build_page_summary<D>(links: &LinkResolver<'_>, doc: &D) -> Result<PageSummary, BuildError>
where
    D: DocumentSource + ?Sized,
{
    let wiki = doc.wiki()?;
    let space = doc.space()?;
    let name = doc.name()?;

    let mut summary = PageSummary {
        id: doc.prefixed_full_name()?,
        full_name: doc.full_name()?,
        title: doc.title()?,
        xwiki_url: doc.view_url()?,
        ..PageSummary::default()
    };

    let params = page_parameters(&wiki, &space, &name);
    summary.translations = translations(links, doc, &params, ResourceType::PageTranslation)?;
    summary
        .links
        .push(links.link(ResourceType::Page, &params, Relation::Page)?);
    summary
        .links
        .push(links.link(ResourceType::Space, &params, Relation::Space)?);

    if let Some((parent, link)) = parent_link(links, doc, &wiki)? {
        summary.parent = Some(parent);
        summary.links.push(link);
    }

    summary.wiki = wiki;
    summary.space = space;
    summary.name = name;
    Ok(summary)
}

fn build_page<D>(
    links: &LinkResolver<'_>,
    doc: &D,
    request_uri: &str,
    use_version: bool,
) -> Result<Page, BuildError>
where
    D: DocumentSource + ?Sized,
{
    let wiki = doc.wiki()?;
    let space = doc.space()?;
    let name = doc.name()?;
    let version = doc.version()?;

    let mut page = Page {
        id: doc.prefixed_full_name()?,
        full_name: doc.full_name()?,
        title: doc.title()?,
        version: version.to_string(),
        major_version: version.major,
        minor_version: version.minor,
        language: doc.language()?,
        xwiki_url: doc.view_url()?,
        creator: doc.creator()?,
        created: doc.created()?,
        modifier: doc.content_author()?,
        modified: doc.content_updated()?,
        content: doc.content()?,
        ..Page::default()
    };

    let params = versioned_page_parameters(&wiki, &space, &name, version);
    let translation_type = pick(
        use_version,
        ResourceType::PageTranslationVersion,
        ResourceType::PageTranslation,
    );
    page.translations = translations(links, doc, &params, translation_type)?;

    page.links.push(Link::new(request_uri, Relation::SelfRef));
    page.links
        .push(links.link(ResourceType::Space, &params, Relation::Space)?);
    page.links
        .push(links.link(ResourceType::PageHistory, &params, Relation::History)?);

    if let Some((parent, link)) = parent_link(links, doc, &wiki)? {
        page.parent = Some(parent);
        page.links.push(link);
    }

    if !doc.comments()?.is_empty() {
        let ty = pick(use_version, ResourceType::CommentsAtVersion, ResourceType::Comments);
        page.links.push(links.link(ty, &params, Relation::Comments)?);
    }

    if !doc.attachments()?.is_empty() {
        let ty = pick(
            use_version,
            ResourceType::AttachmentsAtVersion,
            ResourceType::Attachments,
        );
        page.links.push(links.link(ty, &params, Relation::Attachments)?);
    }

    // Objects are always addressed relative to the page, never a revision.
    if !doc.objects()?.is_empty() {
        page.links
            .push(links.link(ResourceType::Objects, &params, Relation::Objects)?);
    }

    page.wiki = wiki;
    page.space = space;
    page.name = name;
    Ok(page)
}

/// Translation links, one per declared language. The default translation is
/// only recorded when at least one translation exists.
fn translations<D>(
    links: &LinkResolver<'_>,
    doc: &D,
    params: &Parameters,
    ty: ResourceType,
) -> Result<Translations, BuildError>
where
    D: DocumentSource + ?Sized,
{
    let languages = doc.translations()?;
    let mut translations = Translations::default();
    if languages.is_empty() {
        return Ok(translations);
    }

    let default_language = doc.default_language()?;
    if !default_language.is_empty() {
        translations.default_translation = Some(default_language);
    }

    for language in languages {
        let params = params.clone().with(Param::LanguageId, language);
        translations
            .links
            .push(links.link(ty, &params, Relation::Translation)?);
    }
    Ok(translations)
}

/// Parent link, only for `space.page` references. Anything else means no parent.
fn parent_link<D>(
    links: &LinkResolver<'_>,
    doc: &D,
    wiki: &str,
) -> Result<Option<(String, Link)>, BuildError>
where
    D: DocumentSource + ?Sized,
{
    let Some(parent) = doc.parent()? else {
        return Ok(None);
    };
    let Some(reference) = PageReference::parse(&parent) else {
        return Ok(None);
    };

    let params = page_parameters(wiki, &reference.space, &reference.page);
    let link = links.link(ResourceType::Page, &params, Relation::Parent)?;
    Ok(Some((parent, link)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::harness::{Harness, href};
    use crate::source::{
        AttachmentEntry, CommentEntry, DocumentSnapshot, ObjectEntry, RcsVersion,
    };

    const PAGE: &str = "/wikis/xwiki/spaces/Main/pages/WebHome";

    fn snapshot() -> DocumentSnapshot {
        let mut doc = DocumentSnapshot::new("xwiki", "Main", "WebHome", RcsVersion::new(3, 2));
        doc.title = "Home".into();
        doc.language = "en".into();
        doc.creator = "XWiki.Admin".into();
        doc.created = 1_000;
        doc.content_author = "XWiki.Editor".into();
        doc.content_updated = 2_000;
        doc.content = "Welcome".into();
        doc.view_url = "http://localhost:8080/xwiki/bin/view/Main/WebHome".into();
        doc
    }

    fn rels(links: &[Link]) -> Vec<Relation> {
        links.iter().map(|link| link.rel).collect()
    }

    #[test]
    fn page_copies_scalars_and_version_pair() {
        let harness = Harness::new();
        let page = page(&harness.links(), &snapshot(), "http://req/self", false).unwrap();

        assert_eq!(page.id, "xwiki:Main.WebHome");
        assert_eq!(page.full_name, "Main.WebHome");
        assert_eq!(page.version, "3.2");
        assert_eq!((page.major_version, page.minor_version), (3, 2));
        assert_eq!(page.modifier, "XWiki.Editor");
        assert_eq!(page.modified, 2_000);
        assert_eq!(page.content, "Welcome");
    }

    #[test]
    fn bare_page_has_self_space_and_history_only() {
        let harness = Harness::new();
        let page = page(&harness.links(), &snapshot(), "http://req/self", false).unwrap();

        assert_eq!(
            rels(&page.links),
            vec![Relation::SelfRef, Relation::Space, Relation::History]
        );
        assert_eq!(page.links[0].href, "http://req/self");
        assert_eq!(page.links[1].href, href("/wikis/xwiki/spaces/Main"));
        assert_eq!(page.links[2].href, href(&format!("{PAGE}/history")));
        assert!(page.translations.links.is_empty());
        assert_eq!(page.translations.default_translation, None);
        assert_eq!(page.parent, None);
    }

    #[test]
    fn no_translations_means_no_default_translation() {
        let harness = Harness::new();
        let mut doc = snapshot();
        doc.default_language = "en".into();

        let page = page(&harness.links(), &doc, "http://req/self", false).unwrap();
        assert!(page.translations.links.is_empty());
        assert_eq!(page.translations.default_translation, None);
    }

    #[test]
    fn translations_link_each_language() {
        let harness = Harness::new();
        let mut doc = snapshot();
        doc.translations = vec!["fr".into(), "de".into()];
        doc.default_language = "en".into();

        let page = page(&harness.links(), &doc, "http://req/self", false).unwrap();
        assert_eq!(page.translations.default_translation.as_deref(), Some("en"));
        let langs: Vec<_> = page
            .translations
            .links
            .iter()
            .map(|link| link.href_lang.as_deref())
            .collect();
        assert_eq!(langs, vec![Some("fr"), Some("de")]);
        assert_eq!(
            page.translations.links[0].href,
            href(&format!("{PAGE}/translations/fr"))
        );
    }

    #[test]
    fn empty_default_language_is_not_recorded() {
        let harness = Harness::new();
        let mut doc = snapshot();
        doc.translations = vec!["fr".into()];

        let page = page(&harness.links(), &doc, "http://req/self", false).unwrap();
        assert_eq!(page.translations.links.len(), 1);
        assert_eq!(page.translations.default_translation, None);
    }

    #[test]
    fn versioned_translation_links_encode_revision() {
        let harness = Harness::new();
        let mut doc = snapshot();
        doc.translations = vec!["fr".into()];

        let page = page(&harness.links(), &doc, "http://req/self", true).unwrap();
        assert_eq!(
            page.translations.links[0].href,
            href(&format!("{PAGE}/translations/fr/history/3.2"))
        );
    }

    #[test]
    fn parent_link_requires_separator() {
        let harness = Harness::new();
        let mut doc = snapshot();
        doc.parent = Some("MySpace.MyPage".into());
        let page = page(&harness.links(), &doc, "http://req/self", false).unwrap();
        assert_eq!(page.parent.as_deref(), Some("MySpace.MyPage"));
        let parent = page.links.iter().find(|l| l.rel == Relation::Parent).unwrap();
        assert_eq!(parent.href, href("/wikis/xwiki/spaces/MySpace/pages/MyPage"));

        doc.parent = Some("MyPage".into());
        let page = super::page(&harness.links(), &doc, "http://req/self", false).unwrap();
        assert_eq!(page.parent, None);
        assert!(page.links.iter().all(|l| l.rel != Relation::Parent));
    }

    #[test]
    fn collection_links_follow_their_own_collection() {
        let harness = Harness::new();
        let mut doc = snapshot();
        doc.comments = vec![CommentEntry::default()];

        let page = page(&harness.links(), &doc, "http://req/self", false).unwrap();
        assert!(page.links.iter().any(|l| l.rel == Relation::Comments));
        assert!(page.links.iter().all(|l| l.rel != Relation::Attachments));
        assert!(page.links.iter().all(|l| l.rel != Relation::Objects));

        doc.comments.clear();
        doc.attachments = vec![AttachmentEntry::default()];
        doc.objects = vec![ObjectEntry {
            guid: "g".into(),
            class_name: "XWiki.TagClass".into(),
            number: 0,
            pretty_name: String::new(),
            properties: vec![],
        }];
        let page = super::page(&harness.links(), &doc, "http://req/self", false).unwrap();
        assert!(page.links.iter().all(|l| l.rel != Relation::Comments));
        assert!(page.links.iter().any(|l| l.rel == Relation::Attachments));
        assert!(page.links.iter().any(|l| l.rel == Relation::Objects));
    }

    #[test]
    fn use_version_switches_collection_resources() {
        let harness = Harness::new();
        let mut doc = snapshot();
        doc.comments = vec![CommentEntry::default()];
        doc.attachments = vec![AttachmentEntry::default()];
        doc.objects = vec![ObjectEntry {
            guid: "g".into(),
            class_name: "XWiki.TagClass".into(),
            number: 0,
            pretty_name: String::new(),
            properties: vec![],
        }];

        let latest = page(&harness.links(), &doc, "http://req/self", false).unwrap();
        let at_version = page(&harness.links(), &doc, "http://req/self", true).unwrap();
        let find = |page: &Page, rel| {
            page.links
                .iter()
                .find(|l| l.rel == rel)
                .map(|l| l.href.clone())
                .unwrap()
        };

        assert_eq!(find(&latest, Relation::Comments), href(&format!("{PAGE}/comments")));
        assert_eq!(
            find(&at_version, Relation::Comments),
            href(&format!("{PAGE}/history/3.2/comments"))
        );
        assert_eq!(
            find(&at_version, Relation::Attachments),
            href(&format!("{PAGE}/history/3.2/attachments"))
        );
        assert_eq!(
            find(&latest, Relation::Objects),
            find(&at_version, Relation::Objects)
        );
    }

    #[test]
    fn summary_links_page_and_space() {
        let harness = Harness::new();
        let mut doc = snapshot();
        doc.parent = Some("Main.Dashboard".into());
        doc.translations = vec!["fr".into()];

        let summary = page_summary(&harness.links(), &doc).unwrap();
        assert_eq!(summary.name, "WebHome");
        assert_eq!(summary.title, "Home");
        assert_eq!(
            rels(&summary.links),
            vec![Relation::Page, Relation::Space, Relation::Parent]
        );
        assert_eq!(summary.links[0].href, href(PAGE));
        assert_eq!(summary.parent.as_deref(), Some("Main.Dashboard"));
        assert_eq!(
            summary.translations.links[0].href,
            href(&format!("{PAGE}/translations/fr"))
        );
    }
}
