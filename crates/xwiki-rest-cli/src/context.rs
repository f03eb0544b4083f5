use std::env;
use std::path::PathBuf;

use xwiki_rest::{LinkResolver, ResourceRegistry, RootReference, RouteTable};

use crate::error::CliError;
use crate::util::Verbosity;

pub const ROOT_ENV: &str = "XWIKI_REST_ROOT";
pub const DEFAULT_ROOT: &str = "http://localhost:8080/xwiki/rest";

/// Per-invocation state: the root reference and the registry every command
/// resolves links against. Both are fixed before any command runs.
pub struct CliSession {
    pub root: RootReference,
    pub registry: ResourceRegistry,
    pub routes_source: String,
    pub verbosity: Verbosity,
}

impl CliSession {
    pub fn bootstrap(
        root_override: Option<String>,
        routes_override: Option<PathBuf>,
        verbosity: Verbosity,
    ) -> Result<Self, CliError> {
        let raw_root = match root_override {
            Some(root) => root,
            None => env::var(ROOT_ENV).unwrap_or_else(|_| DEFAULT_ROOT.to_string()),
        };
        let root = RootReference::parse(&raw_root)?;

        let (registry, routes_source) = match routes_override {
            Some(path) => {
                let table = RouteTable::from_path(&path)?;
                (table.into_registry()?, path.display().to_string())
            }
            None => (ResourceRegistry::standard()?, "built-in".to_string()),
        };

        Ok(Self {
            root,
            registry,
            routes_source,
            verbosity,
        })
    }

    pub fn links(&self) -> LinkResolver<'_> {
        LinkResolver::new(&self.root, &self.registry)
    }
}
