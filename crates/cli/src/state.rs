//! Session state: the executor plus the current scope and run identity.

use std::io::Read;

use stash_core::{ExecutionId, Scope, WorkflowId};
use stash_executor::{Command, Error, Executor, Invocation, ItemRecord, Output};

/// State carried across commands in one CLI session.
pub struct SessionState {
    executor: Executor,
    invocation: Invocation,
    scope: Scope,
}

impl SessionState {
    pub fn new(executor: Executor, invocation: Invocation) -> Self {
        Self {
            executor,
            invocation,
            scope: Scope::default(),
        }
    }

    /// Default scope for commands without `--scope`.
    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn execution_id(&self) -> &ExecutionId {
        &self.invocation.execution_id
    }

    pub fn workflow_id(&self) -> &WorkflowId {
        &self.invocation.workflow_id
    }

    /// Switch scope and, optionally, the run identity.
    pub fn switch(&mut self, scope: Scope, execution: Option<String>, workflow: Option<String>) {
        self.scope = scope;
        if let Some(execution) = execution {
            self.invocation.execution_id = ExecutionId::new(execution);
        }
        if let Some(workflow) = workflow {
            self.invocation.workflow_id = WorkflowId::new(workflow);
        }
    }

    /// Prompt text for the REPL.
    pub fn prompt(&self) -> String {
        match self.scope {
            Scope::Global => "stash:global> ".to_string(),
            Scope::Execution => format!("stash:execution({})> ", self.execution_id()),
            Scope::Workflow => format!("stash:workflow({})> ", self.workflow_id()),
        }
    }

    pub fn execute(&self, command: Command) -> Result<Output, Error> {
        self.executor.execute(command, &self.invocation)
    }

    /// Run a batch file: a JSON array of items, or a single item object.
    pub fn run_batch(&self, path: &str) -> Result<Vec<ItemRecord>, String> {
        let text = if path == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("Failed to read stdin: {}", e))?;
            buf
        } else {
            std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?
        };
        let items = match serde_json::from_str::<serde_json::Value>(&text)
            .map_err(|e| format!("Invalid batch JSON: {}", e))?
        {
            serde_json::Value::Array(items) => items,
            item @ serde_json::Value::Object(_) => vec![item],
            _ => return Err("Batch must be a JSON array of items".to_string()),
        };
        self.executor
            .execute_batch(items, &self.invocation)
            .map_err(|e| e.to_string())
    }
}
