use std::process::ExitCode;

use serde_json::json;

use crate::commands::{CommandResult, RenderedItem};
use crate::error::CliError;

pub enum OutputFormat {
    Text,
    Json,
}

/// Renders a `CommandResult` as human-readable text or a single JSON document.
/// Failures surface earlier as `CliError`, so a rendered result always exits 0.
pub fn emit_result(result: CommandResult, format: OutputFormat) -> Result<ExitCode, CliError> {
    match format {
        OutputFormat::Text => print_text(&result)?,
        OutputFormat::Json => print_json(&result)?,
    };
    Ok(ExitCode::SUCCESS)
}

fn print_text(result: &CommandResult) -> Result<(), CliError> {
    match result {
        CommandResult::Routes { source, routes } => {
            println!("Resource table ({source}, {} entries):", routes.len());
            for route in routes {
                println!("  {} {}", route.resource, route.pattern);
            }
        }
        CommandResult::Schema { schema, .. } => {
            println!("{}", serde_json::to_string_pretty(schema)?);
        }
        CommandResult::Rendered {
            kind,
            representations,
        } => {
            if representations.is_empty() {
                println!("No {kind} representations");
            }
            for item in representations {
                print_item(kind, item);
            }
        }
    }
    Ok(())
}

fn print_item(kind: &str, item: &RenderedItem) {
    println!("{kind} {}", item.label);
    for link in &item.links {
        match &link.href_lang {
            Some(lang) => println!("  {} [{lang}] {}", link.rel, link.href),
            None => println!("  {} {}", link.rel, link.href),
        }
    }
}

fn print_json(result: &CommandResult) -> Result<(), CliError> {
    let payload = json!(result);
    println!("{payload}");
    Ok(())
}
