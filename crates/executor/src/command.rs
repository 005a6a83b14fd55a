//! Commands accepted by the [`Executor`](crate::Executor)

use stash_core::{Scope, SetMode, Value};

/// A single store operation against one scope
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Assign one or more paths, in order
    Set {
        /// Target scope
        scope: Scope,
        /// `(path, value)` pairs
        entries: Vec<(String, Value)>,
        /// Conditional write mode
        mode: SetMode,
    },
    /// Read one path
    Get {
        /// Target scope
        scope: Scope,
        /// Path to read
        key: String,
    },
    /// Copy of the whole scope tree
    GetAll {
        /// Target scope
        scope: Scope,
    },
    /// Whether a path holds a value
    Exists {
        /// Target scope
        scope: Scope,
        /// Path to test
        key: String,
    },
    /// Add to a counter
    Increment {
        /// Target scope
        scope: Scope,
        /// Counter path
        key: String,
        /// Amount, an `Int` or `Float`
        amount: Value,
    },
    /// Subtract from a counter
    Decrement {
        /// Target scope
        scope: Scope,
        /// Counter path
        key: String,
        /// Amount, an `Int` or `Float`
        amount: Value,
    },
    /// Append to an array
    Push {
        /// Target scope
        scope: Scope,
        /// Array path
        key: String,
        /// Element to append
        value: Value,
    },
    /// Prepend to an array
    Unshift {
        /// Target scope
        scope: Scope,
        /// Array path
        key: String,
        /// Element to prepend
        value: Value,
    },
    /// Remove the last element of an array
    Pop {
        /// Target scope
        scope: Scope,
        /// Array path
        key: String,
    },
    /// Remove the first element of an array
    Shift {
        /// Target scope
        scope: Scope,
        /// Array path
        key: String,
    },
    /// Delete a path
    Remove {
        /// Target scope
        scope: Scope,
        /// Path to delete
        key: String,
    },
    /// Empty the scope, or delete one path
    Clear {
        /// Target scope
        scope: Scope,
        /// Path to delete; `None` empties the whole tree
        key: Option<String>,
    },
    /// Partition entry counts and sizes
    Stats,
    /// Evict idle entries now
    Sweep,
}

impl Command {
    /// Operation name as used in item parameters and records
    pub fn name(&self) -> &'static str {
        match self {
            Command::Set { .. } => "set",
            Command::Get { .. } => "get",
            Command::GetAll { .. } => "getAll",
            Command::Exists { .. } => "exists",
            Command::Increment { .. } => "increment",
            Command::Decrement { .. } => "decrement",
            Command::Push { .. } => "push",
            Command::Unshift { .. } => "unshift",
            Command::Pop { .. } => "pop",
            Command::Shift { .. } => "shift",
            Command::Remove { .. } => "remove",
            Command::Clear { .. } => "clear",
            Command::Stats => "stats",
            Command::Sweep => "sweep",
        }
    }

    /// Scope the command targets; `None` for store-wide commands
    pub fn scope(&self) -> Option<Scope> {
        match self {
            Command::Set { scope, .. }
            | Command::Get { scope, .. }
            | Command::GetAll { scope }
            | Command::Exists { scope, .. }
            | Command::Increment { scope, .. }
            | Command::Decrement { scope, .. }
            | Command::Push { scope, .. }
            | Command::Unshift { scope, .. }
            | Command::Pop { scope, .. }
            | Command::Shift { scope, .. }
            | Command::Remove { scope, .. }
            | Command::Clear { scope, .. } => Some(*scope),
            Command::Stats | Command::Sweep => None,
        }
    }

    /// Whether the command can modify a scope tree
    pub fn is_write(&self) -> bool {
        !matches!(
            self,
            Command::Get { .. }
                | Command::GetAll { .. }
                | Command::Exists { .. }
                | Command::Stats
                | Command::Sweep
        )
    }
}
