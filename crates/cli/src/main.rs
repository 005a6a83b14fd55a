//! Stash CLI: Redis-inspired CLI for the Stash scoped store.
//!
//! Three modes:
//! - **Shell mode**: `stash [flags] COMMAND`: single command, exit
//! - **REPL mode**: `stash [flags]`: interactive prompt (if stdin is TTY)
//! - **Pipe mode**: `echo "set k v" | stash`: line-by-line from stdin
//!
//! The store lives in this process, so state only persists across commands
//! within one REPL or pipe session. `stash batch items.json` runs a list of
//! JSON items the same way a host invocation would.
//!
//! Logging goes to stderr, filtered by `STASH_LOG` (or `RUST_LOG`).

mod commands;
mod format;
mod parse;
mod repl;
mod state;
mod value;

use std::io::IsTerminal;
use std::process;
use std::sync::Arc;

use stash_core::{ExecutionId, WorkflowId};
use stash_engine::{Store, StoreConfig};
use stash_executor::{Executor, Invocation};
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::{format_error, format_output, format_records, OutputMode};
use parse::{matches_to_action, CliAction};
use state::SessionState;

fn main() {
    init_tracing();

    let cli = build_cli();
    let matches = cli.get_matches();

    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("(error) {}", e);
            process::exit(1);
        }
    };

    let execution = matches
        .get_one::<String>("execution")
        .map(ExecutionId::new)
        .unwrap_or_else(ExecutionId::generate);
    let workflow = matches
        .get_one::<String>("workflow")
        .map(WorkflowId::new)
        .unwrap_or_else(|| WorkflowId::new("cli"));
    let invocation = Invocation::new(execution, workflow).lenient(matches.get_flag("lenient"));

    let executor = Executor::new(Arc::new(Store::with_config(config)));
    let mut state = SessionState::new(executor, invocation);

    if matches.subcommand().is_some() {
        // Shell mode: parse, execute, format, exit
        let exit_code = run_shell_mode(&matches, &state, output_mode);
        process::exit(exit_code);
    } else if std::io::stdin().is_terminal() {
        repl::run_repl(&mut state, output_mode);
    } else {
        let exit_code = repl::run_pipe(&mut state, output_mode);
        process::exit(exit_code);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("STASH_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// `--config` file first, then flag overrides.
fn load_config(matches: &clap::ArgMatches) -> Result<StoreConfig, String> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => StoreConfig::from_file(path).map_err(|e| e.to_string())?,
        None => StoreConfig::default(),
    };
    if let Some(ttl_ms) = matches.get_one::<u64>("ttl-ms") {
        config.ttl_ms = *ttl_ms;
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn run_shell_mode(matches: &clap::ArgMatches, state: &SessionState, mode: OutputMode) -> i32 {
    match matches_to_action(matches, state) {
        Ok(CliAction::Execute(cmd)) => {
            let (op, scope) = (cmd.name(), cmd.scope());
            match state.execute(cmd) {
                Ok(output) => {
                    println!("{}", format_output(op, scope, &output, mode));
                    0
                }
                Err(e) => {
                    eprintln!("{}", format_error(&e, mode));
                    1
                }
            }
        }
        Ok(CliAction::Batch { path }) => match state.run_batch(&path) {
            Ok(records) => {
                println!("{}", format_records(&records, mode));
                if records.iter().all(|r| r.success) {
                    0
                } else {
                    1
                }
            }
            Err(e) => {
                eprintln!("(error) {}", e);
                1
            }
        },
        Err(e) => {
            eprintln!("(error) {}", e);
            1
        }
    }
}
