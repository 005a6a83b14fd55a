//! Command-line value parsing.

use stash_core::Value;
use stash_executor::{decode_value, ValueType};

/// Parse a value argument.
///
/// With an explicit type the text is decoded as that type. Otherwise it is
/// read as JSON when possible (`42`, `true`, `[1,2]`) and kept as a plain
/// string when not.
pub fn parse_value(raw: &str, value_type: Option<&str>) -> Result<Value, String> {
    let ty = match value_type {
        Some(name) => name.parse::<ValueType>().map_err(|e| e.to_string())?,
        None => ValueType::Json,
    };
    decode_value(serde_json::Value::String(raw.to_string()), ty, "value").map_err(|e| e.to_string())
}

/// Parse a counter amount, defaulting to 1.
pub fn parse_amount(raw: Option<&str>) -> Result<Value, String> {
    match raw {
        None => Ok(Value::Int(1)),
        Some(raw) => decode_value(
            serde_json::Value::String(raw.to_string()),
            ValueType::Number,
            "amount",
        )
        .map_err(|e| e.to_string()),
    }
}
