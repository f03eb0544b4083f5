use crate::assemble::{log_abandoned, pick, versioned_page_parameters};
use crate::error::BuildError;
use crate::link::{LinkResolver, Relation};
use crate::registry::ResourceType;
use crate::representation::Comment;
use crate::source::{CommentEntry, DocumentSource};
use crate::template::Param;

/// Comment attached to `doc`; properties missing on the comment stay unset.
pub fn comment<D>(
    links: &LinkResolver<'_>,
    doc: &D,
    entry: &CommentEntry,
    use_version: bool,
) -> Result<Comment, BuildError>
where
    D: DocumentSource + ?Sized,
{
    build_comment(links, doc, entry, use_version).inspect_err(log_abandoned("comment"))
}

fn build_comment<D>(
    links: &LinkResolver<'_>,
    doc: &D,
    entry: &CommentEntry,
    use_version: bool,
) -> Result<Comment, BuildError>
where
    D: DocumentSource + ?Sized,
{
    let params = versioned_page_parameters(&doc.wiki()?, &doc.space()?, &doc.name()?, doc.version()?)
        .with(Param::CommentId, entry.number.to_string());

    let page_type = pick(use_version, ResourceType::PageVersion, ResourceType::Page);
    let self_type = pick(use_version, ResourceType::CommentAtVersion, ResourceType::Comment);

    Ok(Comment {
        id: entry.number,
        author: entry.author.clone(),
        date: entry.date,
        highlight: entry.highlight.clone(),
        text: entry.text.clone(),
        links: vec![
            links.link(page_type, &params, Relation::Page)?,
            links.link(self_type, &params, Relation::SelfRef)?,
        ],
    })
}
