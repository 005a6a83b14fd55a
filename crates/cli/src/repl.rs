//! REPL and pipe modes.

use std::io::BufRead;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use stash_core::Scope;

use crate::commands::build_cli;
use crate::format::{format_error, format_output, format_records, OutputMode};
use crate::parse::{check_meta_command, matches_to_action, CliAction, MetaCommand};
use crate::state::SessionState;

/// What the caller should do after a line.
#[derive(Debug, PartialEq, Eq)]
enum LineResult {
    Continue,
    Failed,
    Quit,
}

/// Interactive prompt with history.
pub fn run_repl(state: &mut SessionState, mode: OutputMode) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("(error) Failed to start line editor: {}", e);
            return;
        }
    };
    let history = history_path();
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline(&state.prompt()) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line.as_str());
                if process_line(&line, state, mode) == LineResult::Quit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("(error) {}", e);
                break;
            }
        }
    }

    if let Some(path) = &history {
        let _ = editor.save_history(path);
    }
}

/// Read commands line by line from stdin. Returns the process exit code.
pub fn run_pipe(state: &mut SessionState, mode: OutputMode) -> i32 {
    let mut exit_code = 0;
    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("(error) {}", e);
                return 1;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match process_line(trimmed, state, mode) {
            LineResult::Continue => {}
            LineResult::Failed => exit_code = 1,
            LineResult::Quit => break,
        }
    }
    exit_code
}

fn process_line(line: &str, state: &mut SessionState, mode: OutputMode) -> LineResult {
    if let Some(meta) = check_meta_command(line) {
        return run_meta(meta, state);
    }

    let Some(words) = shlex::split(line) else {
        eprintln!("(error) Unbalanced quotes");
        return LineResult::Failed;
    };
    let matches = match build_cli()
        .try_get_matches_from(std::iter::once("stash".to_string()).chain(words))
    {
        Ok(matches) => matches,
        Err(e) => {
            eprintln!("{}", e.render());
            return LineResult::Failed;
        }
    };

    match matches_to_action(&matches, state) {
        Ok(CliAction::Execute(cmd)) => {
            let (op, scope) = (cmd.name(), cmd.scope());
            match state.execute(cmd) {
                Ok(output) => {
                    println!("{}", format_output(op, scope, &output, mode));
                    LineResult::Continue
                }
                Err(e) => {
                    eprintln!("{}", format_error(&e, mode));
                    LineResult::Failed
                }
            }
        }
        Ok(CliAction::Batch { path }) => match state.run_batch(&path) {
            Ok(records) => {
                println!("{}", format_records(&records, mode));
                LineResult::Continue
            }
            Err(e) => {
                eprintln!("(error) {}", e);
                LineResult::Failed
            }
        },
        Err(e) => {
            eprintln!("(error) {}", e);
            LineResult::Failed
        }
    }
}

fn run_meta(meta: MetaCommand, state: &mut SessionState) -> LineResult {
    match meta {
        MetaCommand::Quit => LineResult::Quit,
        MetaCommand::Help { command } => {
            let mut cli = build_cli();
            let help = match command.as_deref() {
                Some(name) => match cli.find_subcommand_mut(name) {
                    Some(sub) => sub.render_help(),
                    None => {
                        eprintln!("(error) Unknown command: {}", name);
                        return LineResult::Failed;
                    }
                },
                None => cli.render_help(),
            };
            println!("{}", help);
            println!("Meta-commands: use <scope> [execution] [workflow], help [command], quit");
            LineResult::Continue
        }
        MetaCommand::Use {
            scope,
            execution,
            workflow,
        } => match scope.parse::<Scope>() {
            Ok(scope) => {
                state.switch(scope, execution, workflow);
                LineResult::Continue
            }
            Err(e) => {
                eprintln!("(error) {}", e);
                LineResult::Failed
            }
        },
    }
}

fn history_path() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME").map(|home| std::path::PathBuf::from(home).join(".stash_history"))
}
