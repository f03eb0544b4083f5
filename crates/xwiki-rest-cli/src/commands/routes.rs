use clap::{ArgMatches, Command};
use serde::Serialize;

use crate::commands::CommandResult;
use crate::context::CliSession;
use crate::error::CliError;

#[derive(Clone, Debug, Serialize)]
pub struct RouteSummary {
    pub resource: String,
    pub pattern: String,
    pub placeholders: Vec<String>,
}

pub fn command() -> Command {
    Command::new("routes").about("List the resource table links are resolved against")
}

pub fn run(session: &CliSession, _matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let routes = session
        .registry
        .iter()
        .map(|(resource, template)| RouteSummary {
            resource: resource.to_string(),
            pattern: template.pattern().to_string(),
            placeholders: template.placeholders().map(|p| p.to_string()).collect(),
        })
        .collect();

    Ok(CommandResult::Routes {
        source: session.routes_source.clone(),
        routes,
    })
}
