use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::schema::{InputSchema, ValidationIssue};
use crate::tool::{ToolDefinition, ToolFailure, ToolHandler, ToolResult};

/// Why a tool call did not produce a [`ToolResult`].
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments for tool '{name}': {}", join_issues(.issues))]
    InvalidArguments {
        name: String,
        issues: Vec<ValidationIssue>,
    },

    #[error("Tool '{0}' returned a result without a string 'content' field")]
    MalformedResult(String),

    #[error("Tool '{name}' failed: {source}")]
    Handler {
        name: String,
        #[source]
        source: ToolFailure,
    },
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A registered tool: its contract plus the handler that runs it.
#[derive(Clone)]
pub struct ToolEntry {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
    handler: Arc<dyn ToolHandler>,
}

impl ToolEntry {
    #[must_use]
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema.to_json_schema(),
        }
    }
}

impl std::fmt::Debug for ToolEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolEntry")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish_non_exhaustive()
    }
}

/// Catalog of invocable tools.
///
/// Built mutably during start-up, then shared read-only. Listing order is
/// first-registration order; re-registering a name replaces the entry in place.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    entries: Vec<ToolEntry>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tool, replacing any previous tool with the same name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: InputSchema,
        handler: impl ToolHandler + 'static,
    ) {
        let entry = ToolEntry {
            name: name.into(),
            description: description.into(),
            input_schema,
            handler: Arc::new(handler),
        };

        if let Some(&pos) = self.index.get(&entry.name) {
            tracing::debug!(tool = %entry.name, "replacing registered tool");
            self.entries[pos] = entry;
        } else {
            tracing::debug!(tool = %entry.name, "registering tool");
            self.index.insert(entry.name.clone(), self.entries.len());
            self.entries.push(entry);
        }
    }

    /// Return the tool definitions for the `tools/list` method.
    #[must_use]
    pub fn list(&self) -> Vec<ToolDefinition> {
        self.entries.iter().map(ToolEntry::definition).collect()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolEntry> {
        self.index.get(name).map(|&pos| &self.entries[pos])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up, validate, invoke, then shape-check. Each stage short-circuits.
    ///
    /// # Errors
    ///
    /// See [`CallError`] for the failure at each stage.
    pub fn call(&self, name: &str, arguments: &Map<String, Value>) -> Result<ToolResult, CallError> {
        let entry = self
            .get(name)
            .ok_or_else(|| CallError::NotFound(name.to_string()))?;

        let args = entry
            .input_schema
            .validate(arguments)
            .map_err(|issues| CallError::InvalidArguments {
                name: name.to_string(),
                issues,
            })?;

        let output = entry.handler.call(&args).map_err(|source| CallError::Handler {
            name: name.to_string(),
            source,
        })?;

        ToolResult::from_output(output).ok_or_else(|| CallError::MalformedResult(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::schema::{Arguments, FieldSpec};

    fn greet(args: &Arguments) -> Result<Value, ToolFailure> {
        let who = args.str("who").unwrap_or("world");
        Ok(json!({ "content": format!("hello {who}") }))
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(
            "greet",
            "Say hello",
            InputSchema::empty().field(FieldSpec::string("who").required()),
            greet,
        );
        registry
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn call_runs_handler() {
        let result = registry().call("greet", &args(json!({"who": "bob"}))).unwrap();
        assert_eq!(result.content, "hello bob");
        assert!(result.structured_content.is_none());
    }

    #[test]
    fn unknown_tool() {
        let err = registry().call("nonexistent_tool", &Map::new()).unwrap_err();
        assert!(matches!(err, CallError::NotFound(ref n) if n == "nonexistent_tool"));
    }

    #[test]
    fn invalid_arguments_skip_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut registry = ToolRegistry::new();
        registry.register(
            "count",
            "Counts invocations",
            InputSchema::empty().field(FieldSpec::integer("n").required()),
            move |_: &Arguments| -> Result<Value, ToolFailure> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(json!({"content": "ok"}))
            },
        );

        let err = registry.call("count", &args(json!({"n": "abc"}))).unwrap_err();
        let CallError::InvalidArguments { name, issues } = err else {
            panic!("expected invalid arguments");
        };
        assert_eq!(name, "count");
        assert_eq!(issues[0].field, "n");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn malformed_result_detected() {
        let mut registry = ToolRegistry::new();
        registry.register("bad", "No content", InputSchema::empty(), |_: &Arguments| -> Result<Value, ToolFailure> {
            Ok(json!({"structuredContent": {"a": 1}}))
        });
        let err = registry.call("bad", &Map::new()).unwrap_err();
        assert!(matches!(err, CallError::MalformedResult(_)));
    }

    #[test]
    fn handler_failure_propagates() {
        let mut registry = ToolRegistry::new();
        registry.register("boom", "Always fails", InputSchema::empty(), |_: &Arguments| -> Result<Value, ToolFailure> {
            Err(ToolFailure::new("Upstream", "unavailable"))
        });
        let err = registry.call("boom", &Map::new()).unwrap_err();
        let CallError::Handler { source, .. } = err else {
            panic!("expected handler failure");
        };
        assert_eq!(source.kind, "Upstream");
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = registry();
        registry.register("greet", "Say hi", InputSchema::empty(), |_: &Arguments| -> Result<Value, ToolFailure> {
            Ok(json!({"content": "hi"}))
        });

        assert_eq!(registry.len(), 1);
        let tools = registry.list();
        assert_eq!(tools.iter().filter(|t| t.name == "greet").count(), 1);
        assert_eq!(tools[0].description, "Say hi");
        assert_eq!(registry.call("greet", &Map::new()).unwrap().content, "hi");
    }

    #[test]
    fn list_exposes_schema() {
        let tools = registry().list();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].input_schema["required"], json!(["who"]));
    }
}
