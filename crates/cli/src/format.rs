//! Output formatting: Redis-style human text or JSON records.

use stash_core::{Scope, Value};
use stash_executor::{Error, ItemRecord, Output};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Format a command result.
///
/// JSON mode prints the same record a batch item would produce.
pub fn format_output(op: &str, scope: Option<Scope>, output: &Output, mode: OutputMode) -> String {
    if mode == OutputMode::Json {
        return ItemRecord::from_output(op, scope, output.clone())
            .to_json()
            .to_string();
    }

    match output {
        Output::Updated(updates) if updates.len() == 1 => match &updates[0] {
            u if u.error.is_some() => format!("(error) {}", error_text(&u.error)),
            u if u.written => "OK".to_string(),
            _ => "(nil)".to_string(),
        },
        Output::Updated(updates) => updates
            .iter()
            .map(|u| match &u.error {
                Some(_) => format!("{}: (error) {}", u.key, error_text(&u.error)),
                None if u.written => format!("{}: OK", u.key),
                None => format!("{}: (nil)", u.key),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Output::Fetched { value: None, .. } => "(nil)".to_string(),
        Output::Fetched {
            value: Some(value), ..
        } => format_value(value),
        Output::Exists(exists) => format!("(integer) {}", u8::from(*exists)),
        Output::Tree(tree) => pretty(&Value::Object(tree.clone())),
        Output::Counter(counter) => format!(
            "{} (was {})",
            format_value(&counter.new),
            format_value(&counter.old)
        ),
        Output::Length(length) => format!("(integer) {}", length),
        Output::Popped(popped) => format_value(&popped.value),
        Output::Removed(flag) | Output::Cleared(flag) => format!("(integer) {}", u8::from(*flag)),
        Output::Stats(stats) => [
            ("execution", stats.execution),
            ("workflow", stats.workflow),
            ("global", stats.global),
        ]
        .iter()
        .map(|(name, p)| format!("{}: {} entries, {} bytes", name, p.entries, p.bytes))
        .collect::<Vec<_>>()
        .join("\n"),
        Output::Swept(report) => format!(
            "evicted {} entries ({} bytes)",
            report.evicted(),
            report.freed_bytes
        ),
    }
}

/// Format the records of a batch run.
pub fn format_records(records: &[ItemRecord], mode: OutputMode) -> String {
    let json: Vec<serde_json::Value> = records.iter().map(ItemRecord::to_json).collect();
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&json).unwrap_or_default(),
        OutputMode::Human => json
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{}) {}", i + 1, r))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Format an executor error.
pub fn format_error(err: &Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Human => format!("(error) {}", err),
        OutputMode::Json => serde_json::json!({
            "success": false,
            "code": err.code(),
            "error": err.to_string(),
        })
        .to_string(),
    }
}

fn error_text(error: &Option<stash_core::StashError>) -> String {
    error.as_ref().map(|e| e.to_string()).unwrap_or_default()
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "(nil)".to_string(),
        Value::Int(i) => format!("(integer) {}", i),
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(_) | Value::Object(_) => pretty(value),
        other => other.to_string(),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
