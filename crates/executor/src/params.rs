//! Typed parameter decoding for batch items
//!
//! A batch item is a JSON object such as:
//!
//! ```json
//! { "operation": "set", "scope": "workflow", "key": "cart.items",
//!   "value": "[1,2]", "valueType": "json", "mode": "ifAbsent" }
//! ```
//!
//! Values arrive as JSON alongside a `valueType` telling how to read them.
//! `json` values given as text are parsed; text that is not valid JSON is
//! kept as the raw string rather than rejected.

use crate::command::Command;
use crate::error::{Error, Result};
use serde::Deserialize;
use stash_core::{Scope, SetMode, StashError, Value};
use std::str::FromStr;
use tracing::debug;

/// How an item's `value` should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Text
    #[default]
    String,
    /// Integer or float
    Number,
    /// `true` / `false`
    Boolean,
    /// Any JSON document
    Json,
}

impl FromStr for ValueType {
    type Err = StashError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "string" => Ok(ValueType::String),
            "number" => Ok(ValueType::Number),
            "boolean" => Ok(ValueType::Boolean),
            "json" => Ok(ValueType::Json),
            other => Err(StashError::invalid_parameter(
                "valueType",
                format!("unknown value type '{}'", other),
            )),
        }
    }
}

/// One entry of a batched set
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetValue {
    /// Target path
    pub key: String,
    /// Raw value
    #[serde(default)]
    pub value: serde_json::Value,
    /// Overrides the item's `valueType`
    #[serde(default)]
    pub value_type: Option<ValueType>,
}

/// Parameters of one batch item
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemParams {
    /// Operation name, e.g. `set` or `getAll`
    pub operation: String,
    /// Scope name; execution when absent
    pub scope: Option<String>,
    /// Target path
    pub key: Option<String>,
    /// Raw value for set/push/unshift
    pub value: serde_json::Value,
    /// How to interpret `value`
    pub value_type: ValueType,
    /// Counter step; 1 when absent
    pub amount: Option<serde_json::Value>,
    /// Conditional set mode
    pub mode: Option<String>,
    /// Batched set entries, used instead of `key`/`value` when present
    pub values: Option<Vec<SetValue>>,
}

impl ItemParams {
    /// Decode an item object
    pub fn from_json(item: serde_json::Value) -> Result<Self> {
        serde_json::from_value(item).map_err(|e| Error::InvalidItem {
            reason: e.to_string(),
        })
    }

    /// Operation name as supplied
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Resolve the scope parameter
    pub fn scope(&self) -> Result<Scope> {
        match self.scope.as_deref() {
            None | Some("") => Ok(Scope::default()),
            Some(name) => Ok(name.parse()?),
        }
    }

    fn key(&self) -> Result<String> {
        match self.key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key.to_string()),
            _ => Err(StashError::invalid_parameter("key", "required for this operation").into()),
        }
    }

    fn mode(&self) -> Result<SetMode> {
        match self.mode.as_deref() {
            None | Some("") => Ok(SetMode::default()),
            Some(mode) => Ok(mode.parse()?),
        }
    }

    fn amount(&self) -> Result<Value> {
        match &self.amount {
            None | Some(serde_json::Value::Null) => Ok(Value::Int(1)),
            Some(raw) => Ok(decode_value(raw.clone(), ValueType::Number, "amount")?),
        }
    }

    fn value(&self) -> Result<Value> {
        Ok(decode_value(self.value.clone(), self.value_type, "value")?)
    }

    /// Build the command this item describes
    pub fn into_command(self) -> Result<Command> {
        let scope = self.scope()?;
        let command = match self.operation.as_str() {
            "set" => Command::Set {
                scope,
                entries: self.set_entries()?,
                mode: self.mode()?,
            },
            "get" => Command::Get {
                scope,
                key: self.key()?,
            },
            "getAll" => Command::GetAll { scope },
            "exists" => Command::Exists {
                scope,
                key: self.key()?,
            },
            "increment" => Command::Increment {
                scope,
                key: self.key()?,
                amount: self.amount()?,
            },
            "decrement" => Command::Decrement {
                scope,
                key: self.key()?,
                amount: self.amount()?,
            },
            "push" => Command::Push {
                scope,
                key: self.key()?,
                value: self.value()?,
            },
            "unshift" => Command::Unshift {
                scope,
                key: self.key()?,
                value: self.value()?,
            },
            "pop" => Command::Pop {
                scope,
                key: self.key()?,
            },
            "shift" => Command::Shift {
                scope,
                key: self.key()?,
            },
            "remove" => Command::Remove {
                scope,
                key: self.key()?,
            },
            "clear" => Command::Clear {
                scope,
                key: self.key.clone().filter(|k| !k.is_empty()),
            },
            "stats" => Command::Stats,
            "sweep" => Command::Sweep,
            other => {
                return Err(Error::UnknownOperation {
                    operation: other.to_string(),
                })
            }
        };
        Ok(command)
    }

    fn set_entries(&self) -> Result<Vec<(String, Value)>> {
        let Some(values) = &self.values else {
            return Ok(vec![(self.key()?, self.value()?)]);
        };
        if values.is_empty() {
            return Err(StashError::invalid_parameter("values", "at least one entry is required").into());
        }
        values
            .iter()
            .map(|entry| {
                let ty = entry.value_type.unwrap_or(self.value_type);
                let value = decode_value(entry.value.clone(), ty, &entry.key)?;
                Ok((entry.key.clone(), value))
            })
            .collect()
    }
}

/// Interpret a raw JSON parameter according to its declared type.
///
/// `name` labels the parameter in errors.
pub fn decode_value(
    raw: serde_json::Value,
    ty: ValueType,
    name: &str,
) -> std::result::Result<Value, StashError> {
    use serde_json::Value as Json;

    match (ty, raw) {
        (ValueType::String, Json::String(s)) => Ok(Value::String(s)),
        (ValueType::String, Json::Null) => Ok(Value::String(String::new())),
        (ValueType::String, other) => Ok(Value::String(other.to_string())),

        (ValueType::Number, Json::Number(n)) => Ok(Value::from(Json::Number(n))),
        (ValueType::Number, Json::String(s)) => parse_number(&s).ok_or_else(|| {
            StashError::invalid_parameter(name, format!("'{}' is not a number", s))
        }),
        (ValueType::Number, other) => Err(StashError::invalid_parameter(
            name,
            format!("expected a number, got {}", other),
        )),

        (ValueType::Boolean, Json::Bool(b)) => Ok(Value::Bool(b)),
        (ValueType::Boolean, Json::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(StashError::invalid_parameter(
                name,
                format!("'{}' is not a boolean", s),
            )),
        },
        (ValueType::Boolean, other) => Err(StashError::invalid_parameter(
            name,
            format!("expected a boolean, got {}", other),
        )),

        (ValueType::Json, Json::String(s)) => match serde_json::from_str::<Json>(&s) {
            Ok(parsed) => Ok(Value::from(parsed)),
            Err(e) => {
                debug!(param = name, error = %e, "value is not valid JSON, keeping raw string");
                Ok(Value::String(s))
            }
        },
        (ValueType::Json, other) => Ok(Value::from(other)),
    }
}

fn parse_number(text: &str) -> Option<Value> {
    let text = text.trim();
    if let Ok(i) = text.parse::<i64>() {
        return Some(Value::Int(i));
    }
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Value::Float)
}
