use crate::assemble::{log_abandoned, page_parameters, pick, versioned_page_parameters};
use crate::error::BuildError;
use crate::link::{LinkResolver, Relation};
use crate::registry::ResourceType;
use crate::representation::Attachment;
use crate::source::{AttachmentEntry, DocumentSource};
use crate::template::Param;

/// Attachment of `doc` as listed on the page (or on one of its revisions).
pub fn attachment<D>(
    links: &LinkResolver<'_>,
    doc: &D,
    entry: &AttachmentEntry,
    use_version: bool,
) -> Result<Attachment, BuildError>
where
    D: DocumentSource + ?Sized,
{
    build_attachment(links, doc, entry, use_version).inspect_err(log_abandoned("attachment"))
}

fn build_attachment<D>(
    links: &LinkResolver<'_>,
    doc: &D,
    entry: &AttachmentEntry,
    use_version: bool,
) -> Result<Attachment, BuildError>
where
    D: DocumentSource + ?Sized,
{
    let version = doc.version()?;
    let params = versioned_page_parameters(&doc.wiki()?, &doc.space()?, &doc.name()?, version)
        .with(Param::AttachmentName, &entry.filename);

    let mut attachment = fields(entry, version.to_string());
    attachment.id = Some(format!("{}@{}", doc.prefixed_full_name()?, entry.filename));

    let page_type = pick(use_version, ResourceType::PageVersion, ResourceType::Page);
    let data_type = pick(
        use_version,
        ResourceType::AttachmentAtVersion,
        ResourceType::Attachment,
    );
    attachment.links = vec![
        links.link(page_type, &params, Relation::Page)?,
        links.link(data_type, &params, Relation::AttachmentData)?,
        links.link(ResourceType::AttachmentHistory, &params, Relation::History)?,
    ];
    Ok(attachment)
}

/// One historical revision of an attachment; `attachment-data` points at that
/// revision's content.
pub fn attachment_at_version<D>(
    links: &LinkResolver<'_>,
    doc: &D,
    entry: &AttachmentEntry,
) -> Result<Attachment, BuildError>
where
    D: DocumentSource + ?Sized,
{
    build_attachment_at_version(links, doc, entry)
        .inspect_err(log_abandoned("attachment-at-version"))
}

fn build_attachment_at_version<D>(
    links: &LinkResolver<'_>,
    doc: &D,
    entry: &AttachmentEntry,
) -> Result<Attachment, BuildError>
where
    D: DocumentSource + ?Sized,
{
    let params = page_parameters(&doc.wiki()?, &doc.space()?, &doc.name()?);
    let mut attachment = fields(entry, doc.version()?.to_string());

    let data_params = params
        .clone()
        .with(Param::AttachmentName, &entry.filename)
        .with(Param::AttachmentVersion, &entry.version);
    attachment.links = vec![
        links.link(ResourceType::Page, &params, Relation::Page)?,
        links.link(
            ResourceType::AttachmentVersion,
            &data_params,
            Relation::AttachmentData,
        )?,
    ];
    Ok(attachment)
}

fn fields(entry: &AttachmentEntry, page_version: String) -> Attachment {
    Attachment {
        id: None,
        name: entry.filename.clone(),
        size: entry.size,
        version: entry.version.clone(),
        page_version,
        mime_type: entry.mime_type.clone(),
        author: entry.author.clone(),
        date: entry.date,
        xwiki_url: entry.url.clone(),
        links: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::harness::{Harness, href};
    use crate::source::{DocumentSnapshot, RcsVersion};

    const PAGE: &str = "/wikis/xwiki/spaces/Main/pages/WebHome";

    fn doc() -> DocumentSnapshot {
        DocumentSnapshot::new("xwiki", "Main", "WebHome", RcsVersion::new(2, 1))
    }

    fn entry() -> AttachmentEntry {
        AttachmentEntry {
            filename: "logo.png".into(),
            size: 2048,
            version: "1.3".into(),
            mime_type: "image/png".into(),
            author: "XWiki.Admin".into(),
            date: 42,
            url: "http://localhost:8080/xwiki/bin/download/Main/WebHome/logo.png".into(),
        }
    }

    #[test]
    fn attachment_has_id_and_three_links() {
        let harness = Harness::new();
        let attachment = attachment(&harness.links(), &doc(), &entry(), false).unwrap();

        assert_eq!(attachment.id.as_deref(), Some("xwiki:Main.WebHome@logo.png"));
        assert_eq!(attachment.page_version, "2.1");
        assert_eq!(attachment.version, "1.3");
        let rels: Vec<_> = attachment.links.iter().map(|l| l.rel).collect();
        assert_eq!(
            rels,
            vec![Relation::Page, Relation::AttachmentData, Relation::History]
        );
        assert_eq!(attachment.links[0].href, href(PAGE));
        assert_eq!(
            attachment.links[1].href,
            href(&format!("{PAGE}/attachments/logo.png"))
        );
        assert_eq!(
            attachment.links[2].href,
            href(&format!("{PAGE}/attachments/logo.png/history"))
        );
    }

    #[test]
    fn versioned_attachment_addresses_page_revision() {
        let harness = Harness::new();
        let attachment = attachment(&harness.links(), &doc(), &entry(), true).unwrap();

        assert_eq!(attachment.links[0].href, href(&format!("{PAGE}/history/2.1")));
        assert_eq!(
            attachment.links[1].href,
            href(&format!("{PAGE}/history/2.1/attachments/logo.png"))
        );
    }

    #[test]
    fn attachment_at_version_links_revision_data() {
        let harness = Harness::new();
        let attachment = attachment_at_version(&harness.links(), &doc(), &entry()).unwrap();

        assert_eq!(attachment.id, None);
        assert_eq!(attachment.links.len(), 2);
        assert_eq!(attachment.links[0].href, href(PAGE));
        assert_eq!(attachment.links[1].rel, Relation::AttachmentData);
        assert_eq!(
            attachment.links[1].href,
            href(&format!("{PAGE}/attachments/logo.png/history/1.3"))
        );
    }
}
