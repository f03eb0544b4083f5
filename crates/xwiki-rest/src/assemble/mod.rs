//! Representation assemblers.
//!
//! Each assembler copies scalar fields off a source entity, then decides which
//! links apply given the entity's state and resolves them through a
//! [`LinkResolver`](crate::link::LinkResolver). A build either completes or returns a [`BuildError`];
//! partially populated representations never escape.

use crate::error::BuildError;
use crate::registry::ResourceType;
use crate::source::RcsVersion;
use crate::template::{Param, Parameters};

pub mod attachment;
pub mod comment;
pub mod history;
pub mod object;
pub mod page;
pub mod root;

pub use attachment::{attachment, attachment_at_version};
pub use comment::comment;
pub use history::history_summary;
pub use object::{class, object_summary, typed_object_summary};
pub use page::{page, page_summary};
pub use root::{root, space};

/// Parameters addressing a page.
pub fn page_parameters(wiki: &str, space: &str, page: &str) -> Parameters {
    Parameters::new()
        .with(Param::WikiName, wiki)
        .with(Param::SpaceName, space)
        .with(Param::PageName, page)
}

/// Page parameters plus the `major.minor` version.
pub fn versioned_page_parameters(
    wiki: &str,
    space: &str,
    page: &str,
    version: RcsVersion,
) -> Parameters {
    page_parameters(wiki, space, page).with(Param::PageVersion, version.to_string())
}

pub(crate) fn pick(use_version: bool, at_version: ResourceType, latest: ResourceType) -> ResourceType {
    if use_version { at_version } else { latest }
}

pub(crate) fn log_abandoned(kind: &'static str) -> impl Fn(&BuildError) {
    move |err| match err {
        BuildError::Link(source) => {
            tracing::error!(representation = kind, error = %source, "link template mismatch");
        }
        other => {
            tracing::debug!(representation = kind, error = %other, "representation build abandoned");
        }
    }
}
