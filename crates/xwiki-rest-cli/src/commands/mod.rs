use serde::{Serialize, Serializer};
use xwiki_rest::Link;

pub mod render;
pub mod routes;
pub mod schema;

/// One assembled representation plus the links listed in text output.
/// Serializes as the representation alone.
#[derive(Debug)]
pub struct RenderedItem {
    pub label: String,
    pub links: Vec<Link>,
    pub representation: serde_json::Value,
}

impl Serialize for RenderedItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.representation.serialize(serializer)
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandResult {
    Routes {
        source: String,
        routes: Vec<routes::RouteSummary>,
    },
    Schema {
        kind: String,
        schema: serde_json::Value,
    },
    Rendered {
        kind: String,
        representations: Vec<RenderedItem>,
    },
}
