use std::path::Path;

use serde::Serialize;
use xwiki_rest::{DocumentSnapshot, Link};

use crate::commands::RenderedItem;
use crate::error::CliError;

#[derive(Clone, Copy, Debug, Default)]
pub struct Verbosity {
    pub json: bool,
    pub verbose: bool,
}

pub fn load_snapshot(path: &Path) -> Result<DocumentSnapshot, CliError> {
    let snapshot = DocumentSnapshot::from_path(path)?;
    tracing::debug!(
        path = %path.display(),
        page = %format!("{}:{}.{}", snapshot.wiki, snapshot.space, snapshot.name),
        "loaded document snapshot"
    );
    Ok(snapshot)
}

/// Pairs a representation with the links shown in text output.
pub fn rendered<T: Serialize>(
    label: impl Into<String>,
    links: Vec<Link>,
    representation: &T,
) -> Result<RenderedItem, CliError> {
    Ok(RenderedItem {
        label: label.into(),
        links,
        representation: serde_json::to_value(representation)?,
    })
}
