use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command};
use xwiki_rest::{
    DocumentSnapshot, Link, ResourceType, attachment, attachment_at_version, class, comment,
    history_summary, object_summary, page_summary, typed_object_summary,
    versioned_page_parameters,
};

use crate::commands::{CommandResult, RenderedItem};
use crate::context::CliSession;
use crate::error::{CliError, ExitStatus};
use crate::util;

const DEFAULT_SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

fn file_arg() -> Arg {
    Arg::new("file")
        .value_name("FILE")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .help("Document snapshot (YAML or JSON)")
}

fn use_version_arg() -> Arg {
    Arg::new("use-version")
        .long("use-version")
        .action(ArgAction::SetTrue)
        .help("Address the snapshot's revision instead of the latest page")
}

pub fn root_command() -> Command {
    Command::new("root")
        .about("Render the API entry point")
        .arg(
            Arg::new("server-version")
                .long("server-version")
                .value_name("VERSION")
                .help("Version reported by the entry point"),
        )
}

pub fn page_command() -> Command {
    Command::new("page")
        .about("Render the full page representation of a snapshot")
        .arg(file_arg())
        .arg(use_version_arg())
        .arg(
            Arg::new("self")
                .long("self")
                .value_name("URI")
                .help("Request URI echoed as the self link. Defaults to the page URI."),
        )
}

pub fn summary_command() -> Command {
    Command::new("summary")
        .about("Render the page summary of a snapshot")
        .arg(file_arg())
}

pub fn history_command() -> Command {
    Command::new("history")
        .about("Render the history rows of a snapshot")
        .arg(file_arg())
        .arg(
            Arg::new("language")
                .long("language")
                .value_name("LANG")
                .help("Link each row to this translation's revision"),
        )
}

pub fn comments_command() -> Command {
    Command::new("comments")
        .about("Render the comments of a snapshot")
        .arg(file_arg())
        .arg(use_version_arg())
}

pub fn attachments_command() -> Command {
    Command::new("attachments")
        .about("Render the attachments of a snapshot")
        .arg(file_arg())
        .arg(use_version_arg())
        .arg(
            Arg::new("at-version")
                .long("at-version")
                .action(ArgAction::SetTrue)
                .conflicts_with("use-version")
                .help("Render each entry as an attachment revision"),
        )
}

pub fn objects_command() -> Command {
    Command::new("objects")
        .about("Render the objects of a snapshot")
        .arg(file_arg())
        .arg(
            Arg::new("typed")
                .long("typed")
                .action(ArgAction::SetTrue)
                .help("Attach declared property types from the snapshot's classes"),
        )
}

pub fn classes_command() -> Command {
    Command::new("classes")
        .about("Render the class definitions carried by a snapshot")
        .arg(file_arg())
}

pub fn root(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let version = matches
        .get_one::<String>("server-version")
        .map(String::as_str)
        .unwrap_or(DEFAULT_SERVER_VERSION);
    let root = xwiki_rest::root(&session.links(), version)?;
    let item = util::rendered(session.root.as_str(), root.links.clone(), &root)?;
    Ok(rendered("root", vec![item]))
}

pub fn page(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let snapshot = snapshot(matches)?;
    let use_version = matches.get_flag("use-version");
    let links = session.links();

    let request_uri = match matches.get_one::<String>("self") {
        Some(uri) => uri.clone(),
        None => {
            let params = versioned_page_parameters(
                &snapshot.wiki,
                &snapshot.space,
                &snapshot.name,
                snapshot.version,
            );
            let ty = if use_version {
                ResourceType::PageVersion
            } else {
                ResourceType::Page
            };
            links.uri(ty, &params)?
        }
    };

    let page = xwiki_rest::page(&links, &snapshot, &request_uri, use_version)?;
    let shown = with_translations(&page.links, &page.translations.links);
    let item = util::rendered(&page.id, shown, &page)?;
    Ok(rendered("page", vec![item]))
}

pub fn summary(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let snapshot = snapshot(matches)?;
    let summary = page_summary(&session.links(), &snapshot)?;
    let shown = with_translations(&summary.links, &summary.translations.links);
    let item = util::rendered(&summary.id, shown, &summary)?;
    Ok(rendered("page-summary", vec![item]))
}

pub fn history(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let snapshot = snapshot(matches)?;
    let language = matches.get_one::<String>("language").map(String::as_str);
    let links = session.links();

    let items = snapshot
        .history
        .iter()
        .map(|entry| {
            let row = history_summary(&links, &snapshot.wiki, language, entry)?;
            let label = format!("{} {}.{}", row.page_id, row.version, row.minor_version);
            util::rendered(label, row.links.clone(), &row)
        })
        .collect::<Result<Vec<_>, CliError>>()?;
    Ok(rendered("history", items))
}

pub fn comments(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let snapshot = snapshot(matches)?;
    let use_version = matches.get_flag("use-version");
    let links = session.links();

    let items = snapshot
        .comments
        .iter()
        .map(|entry| {
            let comment = comment(&links, &snapshot, entry, use_version)?;
            util::rendered(format!("#{}", comment.id), comment.links.clone(), &comment)
        })
        .collect::<Result<Vec<_>, CliError>>()?;
    Ok(rendered("comment", items))
}

pub fn attachments(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let snapshot = snapshot(matches)?;
    let use_version = matches.get_flag("use-version");
    let at_version = matches.get_flag("at-version");
    let links = session.links();

    let items = snapshot
        .attachments
        .iter()
        .map(|entry| {
            let attachment = if at_version {
                attachment_at_version(&links, &snapshot, entry)?
            } else {
                attachment(&links, &snapshot, entry, use_version)?
            };
            let label = format!("{} {}", attachment.name, attachment.version);
            util::rendered(label, attachment.links.clone(), &attachment)
        })
        .collect::<Result<Vec<_>, CliError>>()?;
    Ok(rendered("attachment", items))
}

pub fn objects(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let snapshot = snapshot(matches)?;
    let typed = matches.get_flag("typed");
    let links = session.links();

    let items = snapshot
        .objects
        .iter()
        .map(|object| {
            let summary = if typed {
                typed_object_summary(&links, &snapshot, &snapshot, object)?
            } else {
                object_summary(&links, &snapshot, object)?
            };
            util::rendered(&summary.id, summary.links.clone(), &summary)
        })
        .collect::<Result<Vec<_>, CliError>>()?;
    Ok(rendered("object", items))
}

pub fn classes(session: &CliSession, matches: &ArgMatches) -> Result<CommandResult, CliError> {
    let snapshot = snapshot(matches)?;
    let links = session.links();

    let items = snapshot
        .classes
        .iter()
        .map(|definition| {
            let class = class(&links, &snapshot.wiki, definition)?;
            util::rendered(&class.class_name, class.links.clone(), &class)
        })
        .collect::<Result<Vec<_>, CliError>>()?;
    Ok(rendered("class", items))
}

fn snapshot(matches: &ArgMatches) -> Result<DocumentSnapshot, CliError> {
    let path = matches
        .get_one::<PathBuf>("file")
        .ok_or_else(|| CliError::new("missing snapshot file", ExitStatus::Usage))?;
    util::load_snapshot(path)
}

fn with_translations(links: &[Link], translations: &[Link]) -> Vec<Link> {
    links.iter().chain(translations).cloned().collect()
}

fn rendered(kind: &str, representations: Vec<RenderedItem>) -> CommandResult {
    CommandResult::Rendered {
        kind: kind.to_string(),
        representations,
    }
}
