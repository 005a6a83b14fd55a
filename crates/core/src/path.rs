//! Dot-separated path access into a value tree
//!
//! A [`Path`] like `"user.profile.name"` addresses nested mapping keys. There
//! is no escaping: a key that itself contains `.` cannot be addressed.
//!
//! Walking semantics:
//!
//! - [`get_at_path`]: any non-object node on the way stops the walk (`None`)
//! - [`set_at_path`]: missing or non-object intermediates are replaced by empty
//!   objects, so a set always succeeds
//! - [`delete_at_path`]: a missing or non-object intermediate makes the delete
//!   a no-op

use crate::error::{Result, StashError};
use crate::value::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Parsed dot-separated path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    raw: String,
    segments: Vec<String>,
}

impl Path {
    /// Parse a dot-separated path.
    ///
    /// Rejects the empty string and empty segments (`"a..b"`, `".a"`).
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(StashError::InvalidPath {
                path: raw.to_string(),
                reason: "path is empty",
            });
        }
        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(StashError::InvalidPath {
                path: raw.to_string(),
                reason: "path contains an empty segment",
            });
        }
        Ok(Path {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Path segments in walk order
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Final segment; scalar reads are reported under this name
    pub fn last(&self) -> &str {
        // parse() guarantees at least one segment
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Original path text
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn split_last(&self) -> (&[String], &str) {
        match self.segments.split_last() {
            Some((last, parents)) => (parents, last.as_str()),
            None => (&[], ""),
        }
    }
}

impl FromStr for Path {
    type Err = StashError;

    fn from_str(s: &str) -> Result<Self> {
        Path::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Resolve `path` inside `root`.
pub fn get_at_path<'a>(root: &'a Map, path: &Path) -> Option<&'a Value> {
    let (parents, last) = path.split_last();
    let mut node = root;
    for seg in parents {
        node = node.get(seg)?.as_object()?;
    }
    node.get(last)
}

/// Mutable variant of [`get_at_path`].
pub fn get_at_path_mut<'a>(root: &'a mut Map, path: &Path) -> Option<&'a mut Value> {
    let (parents, last) = path.split_last();
    let mut node = root;
    for seg in parents {
        node = match node.get_mut(seg)? {
            Value::Object(o) => o,
            _ => return None,
        };
    }
    node.get_mut(last)
}

/// Assign `value` at `path`, creating intermediate objects.
///
/// Intermediates that are missing or hold a non-object are overwritten with an
/// empty object. Returns the value previously stored at `path`, if any.
pub fn set_at_path(root: &mut Map, path: &Path, value: Value) -> Option<Value> {
    let (parents, last) = path.split_last();
    let mut node = root;
    for seg in parents {
        let slot = node.entry(seg.clone()).or_insert_with(Value::object);
        if !matches!(slot, Value::Object(_)) {
            *slot = Value::object();
        }
        let Value::Object(child) = slot else {
            return None;
        };
        node = child;
    }
    node.insert(last.to_string(), value)
}

/// Remove the value at `path`.
///
/// Returns the removed value, or `None` when nothing was there (including
/// when an intermediate segment is missing or not an object).
pub fn delete_at_path(root: &mut Map, path: &Path) -> Option<Value> {
    let (parents, last) = path.split_last();
    let mut node = root;
    for seg in parents {
        node = match node.get_mut(seg)? {
            Value::Object(o) => o,
            _ => return None,
        };
    }
    node.shift_remove(last)
}
