//! Size ceilings for stored values
//!
//! Sizes are measured as the length of the value's compact JSON encoding. The
//! encoding is streamed into a counting sink, so measuring a large value does
//! not allocate a copy of it.
//!
//! Partition accounting works on deltas: [`set_delta`] and [`delete_delta`]
//! compute how much a tree's encoding changes from the slot being written,
//! without encoding the rest of the tree.

use crate::error::{Result, StashError};
use crate::path::Path;
use crate::value::{Map, Value};
use std::io;

/// Default per-value ceiling: 10 MiB
pub const DEFAULT_MAX_VALUE_BYTES: u64 = 10 * 1024 * 1024;

/// Default aggregate ceiling per partition: 100 MiB
pub const DEFAULT_MAX_PARTITION_BYTES: u64 = 100 * 1024 * 1024;

/// `io::Write` sink that only counts bytes
#[derive(Default)]
struct ByteCounter(u64);

impl io::Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0 += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn encoded_len<T: serde::Serialize + ?Sized>(value: &T) -> u64 {
    let mut counter = ByteCounter::default();
    // Serializing a Value into an infallible sink cannot fail
    match serde_json::to_writer(&mut counter, value) {
        Ok(()) => counter.0,
        Err(_) => 0,
    }
}

/// Serialized byte length of a value
pub fn serialized_size(value: &Value) -> u64 {
    encoded_len(value)
}

/// Serialized byte length of a scope tree
pub fn tree_size(tree: &Map) -> u64 {
    encoded_len(tree)
}

/// Reject `value` if it serializes to more than `limit` bytes.
///
/// Returns the measured size on success so callers can reuse it for
/// partition accounting.
pub fn validate_size(value: &Value, path: &str, limit: u64) -> Result<u64> {
    let size = serialized_size(value);
    if size > limit {
        return Err(StashError::SizeLimitExceeded {
            path: path.to_string(),
            size,
            limit,
        });
    }
    Ok(size)
}

// =============================================================================
// Size deltas
// =============================================================================

/// Encoded length of an object key, quotes and escapes included
pub fn key_size(key: &str) -> u64 {
    encoded_len(key)
}

/// `"key":value` plus the separating comma when the object already has members
fn member_size(node: &Map, key: &str, value_size: u64) -> u64 {
    key_size(key) + 1 + value_size + u64::from(!node.is_empty())
}

/// Size of `{"a":{"b":value}}` for the segments `[a, b]`
fn nested_size(segments: &[String], value_size: u64) -> u64 {
    segments
        .iter()
        .rev()
        .fold(value_size, |inner, seg| 2 + key_size(seg) + 1 + inner)
}

fn to_delta(new: u64, old: u64) -> i64 {
    if new >= old {
        i64::try_from(new - old).unwrap_or(i64::MAX)
    } else {
        i64::try_from(old - new).map(|d| -d).unwrap_or(i64::MIN)
    }
}

/// Change in `tree_size(root)` if a value of `value_size` encoded bytes were
/// assigned at `path` with [`set_at_path`](crate::set_at_path).
///
/// Accounts for intermediates that the assignment creates or replaces.
pub fn set_delta(root: &Map, path: &Path, value_size: u64) -> i64 {
    let segments = path.segments();
    let mut node = root;
    for (depth, seg) in segments.iter().enumerate() {
        let rest = &segments[depth + 1..];
        match node.get(seg) {
            Some(Value::Object(child)) if !rest.is_empty() => node = child,
            Some(existing) => {
                return to_delta(nested_size(rest, value_size), serialized_size(existing))
            }
            None => return to_delta(member_size(node, seg, nested_size(rest, value_size)), 0),
        }
    }
    0
}

/// Bytes `tree_size(root)` loses if the value at `path` is deleted, or
/// `None` when nothing is stored there.
pub fn delete_delta(root: &Map, path: &Path) -> Option<u64> {
    let (last, parents) = path.segments().split_last()?;
    let mut node = root;
    for seg in parents {
        node = node.get(seg)?.as_object()?;
    }
    let value = node.get(last)?;
    Some(key_size(last) + 1 + serialized_size(value) + u64::from(node.len() > 1))
}

/// Bytes an array grows by when `item_size` bytes are added to `items`
pub fn array_insert_delta(items: &[Value], item_size: u64) -> u64 {
    item_size + u64::from(!items.is_empty())
}

/// Bytes an array shrinks by once `removed` is taken out and `remaining`
/// elements are left
pub fn array_remove_delta(removed: &Value, remaining: usize) -> u64 {
    serialized_size(removed) + u64::from(remaining > 0)
}
