//! clap command tree for the `stash` binary.

use clap::{Arg, ArgAction, Command};

/// Build the full CLI, shared by shell mode and the REPL.
pub fn build_cli() -> Command {
    Command::new("stash")
        .about("Redis-inspired CLI for the Stash scoped store")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Load store settings from a TOML file"),
        )
        .arg(
            Arg::new("ttl-ms")
                .long("ttl-ms")
                .value_name("MILLIS")
                .value_parser(clap::value_parser!(u64))
                .help("Idle time before execution/workflow entries are evicted"),
        )
        .arg(
            Arg::new("execution")
                .long("execution")
                .short('e')
                .value_name("ID")
                .help("Execution id [default: random per session]"),
        )
        .arg(
            Arg::new("workflow")
                .long("workflow")
                .short('w')
                .value_name("ID")
                .help("Workflow id [default: cli]"),
        )
        .arg(
            Arg::new("scope")
                .long("scope")
                .short('s')
                .value_name("SCOPE")
                .global(true)
                .help("execution, workflow or global"),
        )
        .arg(
            Arg::new("lenient")
                .long("lenient")
                .action(ArgAction::SetTrue)
                .help("Report batch item failures instead of aborting"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print results as JSON records"),
        )
        .subcommand(
            Command::new("set")
                .about("Store a value at a path")
                .arg(Arg::new("key").required(true))
                .arg(Arg::new("value").required(true))
                .arg(value_type_arg())
                .arg(
                    Arg::new("mode")
                        .long("mode")
                        .short('m')
                        .value_name("MODE")
                        .help("always, if-absent (nx) or if-present (xx)"),
                ),
        )
        .subcommand(
            Command::new("get")
                .about("Read the value at a path")
                .arg(Arg::new("key").required(true)),
        )
        .subcommand(
            Command::new("getall")
                .visible_alias("get-all")
                .about("Print the whole scope tree"),
        )
        .subcommand(
            Command::new("exists")
                .about("Test whether a path holds a value")
                .arg(Arg::new("key").required(true)),
        )
        .subcommand(
            Command::new("incr")
                .allow_negative_numbers(true)
                .visible_alias("increment")
                .about("Add to a counter")
                .arg(Arg::new("key").required(true))
                .arg(Arg::new("amount").allow_hyphen_values(true)),
        )
        .subcommand(
            Command::new("decr")
                .allow_negative_numbers(true)
                .visible_alias("decrement")
                .about("Subtract from a counter")
                .arg(Arg::new("key").required(true))
                .arg(Arg::new("amount").allow_hyphen_values(true)),
        )
        .subcommand(
            Command::new("push")
                .about("Append to an array")
                .arg(Arg::new("key").required(true))
                .arg(Arg::new("value").required(true))
                .arg(value_type_arg()),
        )
        .subcommand(
            Command::new("unshift")
                .about("Prepend to an array")
                .arg(Arg::new("key").required(true))
                .arg(Arg::new("value").required(true))
                .arg(value_type_arg()),
        )
        .subcommand(
            Command::new("pop")
                .about("Remove the last element of an array")
                .arg(Arg::new("key").required(true)),
        )
        .subcommand(
            Command::new("shift")
                .about("Remove the first element of an array")
                .arg(Arg::new("key").required(true)),
        )
        .subcommand(
            Command::new("remove")
                .visible_aliases(["rm", "del"])
                .about("Delete a path")
                .arg(Arg::new("key").required(true)),
        )
        .subcommand(
            Command::new("clear")
                .about("Empty the scope, or delete one path")
                .arg(Arg::new("key")),
        )
        .subcommand(Command::new("stats").about("Entry counts and sizes per partition"))
        .subcommand(Command::new("sweep").about("Evict idle entries now"))
        .subcommand(
            Command::new("batch")
                .about("Run a JSON array of items (\"-\" reads stdin)")
                .arg(Arg::new("file").required(true)),
        )
}

fn value_type_arg() -> Arg {
    Arg::new("type")
        .long("type")
        .short('t')
        .value_name("TYPE")
        .help("string, number, boolean or json [default: inferred]")
}
