use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::Arguments;

/// Definition of a tool as advertised by `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// The shape every successful `tools/call` result must have.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: String,
    #[serde(
        rename = "structuredContent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub structured_content: Option<Map<String, Value>>,
}

impl ToolResult {
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            structured_content: None,
        }
    }

    #[must_use]
    pub fn with_structured(mut self, structured: Map<String, Value>) -> Self {
        self.structured_content = Some(structured);
        self
    }

    /// Check raw handler output against the result shape.
    ///
    /// Returns `None` when the output is not an object, has no string
    /// `content`, or carries a `structuredContent` that is not an object.
    #[must_use]
    pub fn from_output(output: Value) -> Option<Self> {
        let Value::Object(mut map) = output else {
            return None;
        };
        let Some(Value::String(content)) = map.remove("content") else {
            return None;
        };
        let structured_content = match map.remove("structuredContent") {
            None | Some(Value::Null) => None,
            Some(Value::Object(structured)) => Some(structured),
            Some(_) => return None,
        };
        Some(Self {
            content,
            structured_content,
        })
    }
}

impl From<ToolResult> for Value {
    fn from(result: ToolResult) -> Self {
        let mut map = Map::new();
        map.insert("content".to_string(), Value::String(result.content));
        if let Some(structured) = result.structured_content {
            map.insert("structuredContent".to_string(), Value::Object(structured));
        }
        Value::Object(map)
    }
}

/// A failure raised by a tool handler while running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolFailure {
    pub kind: String,
    pub message: String,
}

impl ToolFailure {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ToolFailure {}

/// Invocable body of a tool.
///
/// Receives arguments already validated and coerced against the tool's input
/// schema. The returned value is shape-checked by the registry, so handlers
/// producing a [`ToolResult`] should convert it with `Value::from`.
pub trait ToolHandler: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`ToolFailure`] when the tool cannot complete.
    fn call(&self, args: &Arguments) -> Result<Value, ToolFailure>;
}

impl<F> ToolHandler for F
where
    F: Fn(&Arguments) -> Result<Value, ToolFailure> + Send + Sync,
{
    fn call(&self, args: &Arguments) -> Result<Value, ToolFailure> {
        self(args)
    }
}
