use clap::{Arg, ArgMatches, Command};
use schemars::schema_for;
use xwiki_rest::{
    Attachment, Class, Comment, HistorySummary, ObjectSummary, Page, PageSummary, Space,
    XWikiRoot,
};

use crate::commands::CommandResult;
use crate::context::CliSession;
use crate::error::{CliError, ExitStatus};

const KINDS: [&str; 9] = [
    "root",
    "space",
    "page",
    "page-summary",
    "history",
    "comment",
    "attachment",
    "object",
    "class",
];

pub fn command() -> Command {
    Command::new("schema")
        .about("Print the JSON Schema of a representation")
        .arg(
            Arg::new("kind")
                .required(true)
                .value_parser(KINDS)
                .help("Representation to describe"),
        )
}

pub fn run(_session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let kind = matches
        .get_one::<String>("kind")
        .ok_or_else(|| CliError::new("missing representation kind", ExitStatus::Usage))?;

    let schema = match kind.as_str() {
        "root" => schema_for!(XWikiRoot),
        "space" => schema_for!(Space),
        "page" => schema_for!(Page),
        "page-summary" => schema_for!(PageSummary),
        "history" => schema_for!(HistorySummary),
        "comment" => schema_for!(Comment),
        "attachment" => schema_for!(Attachment),
        "object" => schema_for!(ObjectSummary),
        "class" => schema_for!(Class),
        other => {
            return Err(CliError::new(
                format!("unknown representation kind '{other}'"),
                ExitStatus::Usage,
            ));
        }
    };

    Ok(CommandResult::Schema {
        kind: kind.clone(),
        schema: serde_json::to_value(schema)?,
    })
}
