use crate::assemble::log_abandoned;
use crate::error::BuildError;
use crate::link::{LinkResolver, Relation, WADL_MEDIA_TYPE};
use crate::registry::ResourceType;
use crate::representation::{Space, XWikiRoot};
use crate::source::SpaceEntry;
use crate::template::{Param, Parameters};

/// Entry point representation: server version, wiki list and WADL description.
pub fn root(links: &LinkResolver<'_>, version: &str) -> Result<XWikiRoot, BuildError> {
    build_root(links, version).inspect_err(log_abandoned("root"))
}

pub fn space(links: &LinkResolver<'_>, entry: &SpaceEntry) -> Result<Space, BuildError> {
    build_space(links, entry).inspect_err(log_abandoned("space"))
}

fn build_root(links: &LinkResolver<'_>, version: &str) -> Result<XWikiRoot, BuildError> {
    let none = Parameters::new();
    let mut root = XWikiRoot {
        version: version.to_string(),
        links: Vec::with_capacity(2),
    };
    root.links
        .push(links.link(ResourceType::Wikis, &none, Relation::Wikis)?);
    root.links.push(
        links
            .link(ResourceType::Root, &none, Relation::Wadl)?
            .with_media_type(WADL_MEDIA_TYPE),
    );
    Ok(root)
}

fn build_space(links: &LinkResolver<'_>, entry: &SpaceEntry) -> Result<Space, BuildError> {
    let params = Parameters::new()
        .with(Param::WikiName, &entry.wiki)
        .with(Param::SpaceName, &entry.name);
    let pages = links.link(ResourceType::Pages, &params, Relation::Pages)?;

    Ok(Space {
        wiki: entry.wiki.clone(),
        name: entry.name.clone(),
        home: entry.home.clone(),
        xwiki_url: entry.home_url.clone(),
        number_of_pages: entry.page_count,
        links: vec![pages],
    })
}
