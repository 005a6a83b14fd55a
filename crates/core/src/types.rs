//! Core types shared by every layer
//!
//! - [`Scope`]: which partition an operation targets
//! - [`ExecutionId`] / [`WorkflowId`]: scope keys supplied by the host
//! - [`SetMode`]: conditional write modes
//! - [`Timestamp`]: millisecond wall-clock instants used for TTL bookkeeping

use crate::error::StashError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Isolation level of a stored value
///
/// - `Execution`: private to one run (default)
/// - `Workflow`: shared by every run of the same workflow
/// - `Global`: shared by the whole process, never evicted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Per-run partition
    #[default]
    Execution,
    /// Per-workflow partition
    Workflow,
    /// Process-wide single entry
    Global,
}

impl Scope {
    /// All scopes, in partition order
    pub const ALL: [Scope; 3] = [Scope::Execution, Scope::Workflow, Scope::Global];

    /// Canonical scope name
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Execution => "execution",
            Scope::Workflow => "workflow",
            Scope::Global => "global",
        }
    }

    /// Whether entries in this scope expire after the TTL
    pub fn is_evictable(&self) -> bool {
        !matches!(self, Scope::Global)
    }
}

impl FromStr for Scope {
    type Err = StashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "execution" => Ok(Scope::Execution),
            "workflow" => Ok(Scope::Workflow),
            "global" => Ok(Scope::Global),
            other => Err(StashError::invalid_parameter(
                "scope",
                format!("unknown scope '{}'", other),
            )),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an identifier supplied by the host
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Fresh random identifier
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Borrow the identifier text
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of the current workflow run
    ExecutionId
);

string_id!(
    /// Identifier of the workflow, shared by all of its runs
    WorkflowId
);

/// Conditional write mode for `set`
///
/// Mirrors the NX/XX convention of key-value stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SetMode {
    /// Unconditional write
    #[default]
    Always,
    /// Write only when nothing is stored at the path (NX)
    IfAbsent,
    /// Write only when something is stored at the path (XX)
    IfPresent,
}

impl SetMode {
    /// Whether a write should happen given the current presence of a value
    pub fn allows(&self, present: bool) -> bool {
        match self {
            SetMode::Always => true,
            SetMode::IfAbsent => !present,
            SetMode::IfPresent => present,
        }
    }

    /// Canonical mode name
    pub fn as_str(&self) -> &'static str {
        match self {
            SetMode::Always => "always",
            SetMode::IfAbsent => "ifAbsent",
            SetMode::IfPresent => "ifPresent",
        }
    }
}

impl FromStr for SetMode {
    type Err = StashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(SetMode::Always),
            "ifAbsent" | "if-absent" | "nx" | "NX" => Ok(SetMode::IfAbsent),
            "ifPresent" | "if-present" | "xx" | "XX" => Ok(SetMode::IfPresent),
            other => Err(StashError::invalid_parameter(
                "mode",
                format!("unknown set mode '{}'", other),
            )),
        }
    }
}

/// Milliseconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Timestamp from raw milliseconds
    pub const fn from_millis(ms: u64) -> Self {
        Timestamp(ms)
    }

    /// Raw milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Current wall-clock time
    pub fn now() -> Self {
        let ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Timestamp(ms)
    }

    /// Milliseconds elapsed since `earlier`, zero if `earlier` is in the future
    pub fn millis_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}
