use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

use crate::commands;
use crate::context::CliSession;
use crate::error::{CliError, ExitStatus};
use crate::formatter::{OutputFormat, emit_result};
use crate::util::Verbosity;

const NAME: &str = "xwiki-rest";

pub fn run() -> ExitCode {
    match run_cli(std::env::args()) {
        Ok(code) => code,
        Err(err) => {
            err.print();
            err.exit_code()
        }
    }
}

/// Parses arguments, resolves the root reference and resource table, then
/// dispatches to a command. Returns a `sysexits`-compatible `ExitCode`.
pub fn run_cli<I, S>(args: I) -> Result<ExitCode, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let command = build_cli();
    let matches = command.try_get_matches_from(args)?;

    let verbosity = Verbosity {
        json: matches.get_flag("json"),
        verbose: matches.get_flag("verbose"),
    };
    init_tracing(verbosity.verbose);
    let output = if verbosity.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let root_override = matches.get_one::<String>("root").cloned();
    let routes_override = matches.get_one::<PathBuf>("routes").cloned();
    let session = CliSession::bootstrap(root_override, routes_override, verbosity)?;
    tracing::info!(
        root = %session.root,
        routes = %session.routes_source,
        resources = session.registry.len(),
        "resolved link context"
    );

    let result = dispatch(&session, &matches)?;
    emit_result(result, output)
}

/// `RUST_LOG` wins when set; otherwise `--verbose` raises the level to `info`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Root `clap::Command` tree with global flags and every subcommand.
fn build_cli() -> Command {
    Command::new(NAME)
        .about("Assemble XWiki REST representations from document snapshots")
        .arg(
            Arg::new("root")
                .long("root")
                .value_name("URL")
                .global(true)
                .help("Root reference prefixed to every link. Defaults to $XWIKI_REST_ROOT or http://localhost:8080/xwiki/rest."),
        )
        .arg(
            Arg::new("routes")
                .long("routes")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true)
                .help("YAML or JSON file overriding entries of the built-in resource table."),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Emit JSON instead of human-readable text."),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Log the resolved root reference and resource table."),
        )
        .subcommand_required(true)
        .subcommand(commands::routes::command())
        .subcommand(commands::schema::command())
        .subcommand(commands::render::root_command())
        .subcommand(commands::render::page_command())
        .subcommand(commands::render::summary_command())
        .subcommand(commands::render::history_command())
        .subcommand(commands::render::comments_command())
        .subcommand(commands::render::attachments_command())
        .subcommand(commands::render::objects_command())
        .subcommand(commands::render::classes_command())
}

fn dispatch(
    session: &CliSession,
    matches: &ArgMatches,
) -> Result<commands::CommandResult, CliError> {
    match matches.subcommand() {
        Some(("routes", sub)) => commands::routes::run(session, sub),
        Some(("schema", sub)) => commands::schema::run(session, sub),
        Some(("root", sub)) => commands::render::root(session, sub),
        Some(("page", sub)) => commands::render::page(session, sub),
        Some(("summary", sub)) => commands::render::summary(session, sub),
        Some(("history", sub)) => commands::render::history(session, sub),
        Some(("comments", sub)) => commands::render::comments(session, sub),
        Some(("attachments", sub)) => commands::render::attachments(session, sub),
        Some(("objects", sub)) => commands::render::objects(session, sub),
        Some(("classes", sub)) => commands::render::classes(session, sub),
        _ => Err(CliError::new("missing command", ExitStatus::Usage)),
    }
}
