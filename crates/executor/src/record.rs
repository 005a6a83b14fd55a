//! Per-item output records
//!
//! Every batch item yields one [`ItemRecord`]. Records serialize to a flat
//! JSON object: `success`, `op` and `scope` are always present, and the
//! payload fields depend on the operation.
//!
//! | op | payload |
//! |----|---------|
//! | set | `updates` |
//! | get | `value`, `found` |
//! | exists | `exists` |
//! | getAll | `data` |
//! | increment / decrement | `old`, `new` |
//! | push / unshift | `length` |
//! | pop / shift | `value`, `length` |
//! | remove | `removed` |
//! | clear | `cleared` |
//! | stats / sweep | `data` |
//!
//! A failed item carries `success: false`, `code` and `error` instead.

use crate::error::Error;
use crate::output::Output;
use serde::Serialize;
use stash_core::{Map, Scope, Value};
use stash_engine::KeyUpdate;

/// Outcome of one key in a set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateRecord {
    /// Path as supplied
    pub key: String,
    /// Whether the value was stored
    pub written: bool,
    /// Failure message for this key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<KeyUpdate> for UpdateRecord {
    fn from(update: KeyUpdate) -> Self {
        Self {
            key: update.key,
            written: update.written,
            error: update.error.map(|e| e.to_string()),
        }
    }
}

/// Output record for one batch item
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemRecord {
    /// Whether the item succeeded
    pub success: bool,
    /// Operation name
    pub op: String,
    /// Scope the item targeted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,

    /// set: per-key results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updates: Option<Vec<UpdateRecord>>,
    /// get / pop / shift: the value read or removed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// get: whether the path held a value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found: Option<bool>,
    /// exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exists: Option<bool>,
    /// increment / decrement: previous value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old: Option<Value>,
    /// increment / decrement: stored value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new: Option<Value>,
    /// Array length after the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    /// remove
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<bool>,
    /// getAll tree, or stats / sweep report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// clear
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleared: Option<bool>,

    /// Error code of a failed item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    /// Error message of a failed item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ItemRecord {
    fn base(op: &str, scope: Option<Scope>) -> Self {
        Self {
            success: true,
            op: op.to_string(),
            scope,
            ..Self::default()
        }
    }

    /// Record for a successful command
    pub fn from_output(op: &str, scope: Option<Scope>, output: Output) -> Self {
        let mut record = Self::base(op, scope);
        match output {
            Output::Updated(updates) => {
                record.success = updates.iter().all(|u| u.error.is_none());
                record.updates = Some(updates.into_iter().map(UpdateRecord::from).collect());
            }
            Output::Fetched { name, value } => {
                record.found = Some(value.is_some());
                record.value = Some(match value {
                    Some(v) if v.is_composite() => v,
                    Some(v) => wrap(name, v),
                    None => wrap(name, Value::Null),
                });
            }
            Output::Exists(exists) => record.exists = Some(exists),
            Output::Tree(tree) => record.data = Some(Value::Object(tree).into_json()),
            Output::Counter(counter) => {
                record.old = Some(counter.old);
                record.new = Some(counter.new);
            }
            Output::Length(length) => record.length = Some(length),
            Output::Popped(popped) => {
                record.value = Some(popped.value);
                record.length = Some(popped.length);
            }
            Output::Removed(removed) => record.removed = Some(removed),
            Output::Cleared(cleared) => record.cleared = Some(cleared),
            Output::Stats(stats) => record.data = serde_json::to_value(stats).ok(),
            Output::Swept(report) => record.data = serde_json::to_value(report).ok(),
        }
        record
    }

    /// Soft failure record, used in lenient batches
    pub fn failure(op: &str, scope: Option<Scope>, error: &Error) -> Self {
        Self {
            success: false,
            code: Some(error.code()),
            error: Some(error.to_string()),
            ..Self::base(op, scope)
        }
    }

    /// Render as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Scalars are reported as `{ <last segment>: value }`
fn wrap(name: String, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(name, value);
    Value::Object(map)
}
