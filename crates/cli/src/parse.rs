//! ArgMatches → Command/MetaCommand conversion.
//!
//! Translates clap's parsed arguments into the appropriate action:
//! - Store commands → `CliAction::Execute(Command)`
//! - `batch <file>` → `CliAction::Batch`
//!
//! REPL meta-commands (`use`, `help`, `quit`) are recognised before clap runs.

use clap::ArgMatches;
use stash_core::{Scope, SetMode};
use stash_executor::Command;

use crate::state::SessionState;
use crate::value::{parse_amount, parse_value};

/// The result of parsing user input.
pub enum CliAction {
    /// A store command to execute.
    Execute(Command),
    /// Run a JSON batch file.
    Batch { path: String },
}

/// REPL meta-commands.
#[derive(Debug, PartialEq)]
pub enum MetaCommand {
    Use {
        scope: String,
        execution: Option<String>,
        workflow: Option<String>,
    },
    Help {
        command: Option<String>,
    },
    Quit,
}

/// Check for REPL meta-commands before delegating to clap.
///
/// Returns `Some(MetaCommand)` if the line is a meta-command, `None` otherwise.
pub fn check_meta_command(line: &str) -> Option<MetaCommand> {
    let mut parts = line.split_whitespace();
    let cmd = parts.next()?;

    match cmd {
        "quit" | "exit" => Some(MetaCommand::Quit),
        "help" => {
            let command = parts.next().map(str::to_string);
            Some(MetaCommand::Help { command })
        }
        "use" => {
            let scope = parts.next()?.to_string();
            let execution = parts.next().map(str::to_string);
            let workflow = parts.next().map(str::to_string);
            Some(MetaCommand::Use {
                scope,
                execution,
                workflow,
            })
        }
        _ => None,
    }
}

/// Convert clap ArgMatches into a CliAction.
pub fn matches_to_action(matches: &ArgMatches, state: &SessionState) -> Result<CliAction, String> {
    let (sub_name, m) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;

    let scope = scope(m, state)?;
    let command = match sub_name {
        "set" => {
            let value = parse_value(arg(m, "value")?, opt(m, "type"))?;
            let mode = match opt(m, "mode") {
                Some(mode) => mode.parse::<SetMode>().map_err(|e| e.to_string())?,
                None => SetMode::Always,
            };
            Command::Set {
                scope,
                entries: vec![(arg(m, "key")?.to_string(), value)],
                mode,
            }
        }
        "get" => Command::Get {
            scope,
            key: key(m)?,
        },
        "getall" => Command::GetAll { scope },
        "exists" => Command::Exists {
            scope,
            key: key(m)?,
        },
        "incr" => Command::Increment {
            scope,
            key: key(m)?,
            amount: parse_amount(opt(m, "amount"))?,
        },
        "decr" => Command::Decrement {
            scope,
            key: key(m)?,
            amount: parse_amount(opt(m, "amount"))?,
        },
        "push" => Command::Push {
            scope,
            key: key(m)?,
            value: parse_value(arg(m, "value")?, opt(m, "type"))?,
        },
        "unshift" => Command::Unshift {
            scope,
            key: key(m)?,
            value: parse_value(arg(m, "value")?, opt(m, "type"))?,
        },
        "pop" => Command::Pop {
            scope,
            key: key(m)?,
        },
        "shift" => Command::Shift {
            scope,
            key: key(m)?,
        },
        "remove" => Command::Remove {
            scope,
            key: key(m)?,
        },
        "clear" => Command::Clear {
            scope,
            key: opt(m, "key").map(str::to_string),
        },
        "stats" => Command::Stats,
        "sweep" => Command::Sweep,
        "batch" => {
            return Ok(CliAction::Batch {
                path: arg(m, "file")?.to_string(),
            })
        }
        other => return Err(format!("Unknown command: {}", other)),
    };
    Ok(CliAction::Execute(command))
}

// =========================================================================
// Helpers
// =========================================================================

fn scope(m: &ArgMatches, state: &SessionState) -> Result<Scope, String> {
    match opt(m, "scope") {
        Some(name) => name.parse::<Scope>().map_err(|e| e.to_string()),
        None => Ok(state.scope()),
    }
}

fn opt<'a>(m: &'a ArgMatches, name: &str) -> Option<&'a str> {
    m.try_get_one::<String>(name)
        .ok()
        .flatten()
        .map(String::as_str)
}

fn arg<'a>(m: &'a ArgMatches, name: &str) -> Result<&'a str, String> {
    opt(m, name).ok_or_else(|| format!("Missing argument: {}", name))
}

fn key(m: &ArgMatches) -> Result<String, String> {
    arg(m, "key").map(str::to_string)
}
