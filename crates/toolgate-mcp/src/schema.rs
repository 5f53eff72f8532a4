//! Declarative input schemas for tools.
//!
//! A schema is an ordered list of fields. [`InputSchema::validate`] checks an
//! argument map against it, coercing loosely-typed values where the intent is
//! unambiguous (`"42"` for an integer field, `"true"` for a boolean field),
//! and reports every problem it finds rather than only the first.

use std::fmt;

use serde::Serialize;
use serde_json::{json, Map, Number, Value};

/// Accepted JSON type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    Any,
}

impl FieldKind {
    fn json_type(self) -> Option<&'static str> {
        match self {
            Self::String => Some("string"),
            Self::Integer => Some("integer"),
            Self::Number => Some("number"),
            Self::Boolean => Some("boolean"),
            Self::Array => Some("array"),
            Self::Object => Some("object"),
            Self::Any => None,
        }
    }
}

/// One named argument of a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl FieldSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            description: None,
            default: None,
            min_length: None,
            max_length: None,
            minimum: None,
            maximum: None,
        }
    }

    #[must_use]
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    #[must_use]
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    #[must_use]
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    #[must_use]
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Value used when an optional field is absent.
    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    #[must_use]
    pub fn length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    #[must_use]
    pub fn range(mut self, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    fn to_json_schema(&self) -> Value {
        let mut prop = Map::new();
        if let Some(ty) = self.kind.json_type() {
            prop.insert("type".to_string(), json!(ty));
        }
        if let Some(description) = &self.description {
            prop.insert("description".to_string(), json!(description));
        }
        if let Some(default) = &self.default {
            prop.insert("default".to_string(), default.clone());
        }
        if let Some(min) = self.min_length {
            prop.insert("minLength".to_string(), json!(min));
        }
        if let Some(max) = self.max_length {
            prop.insert("maxLength".to_string(), json!(max));
        }
        if let Some(min) = self.minimum {
            prop.insert("minimum".to_string(), json!(min));
        }
        if let Some(max) = self.maximum {
            prop.insert("maximum".to_string(), json!(max));
        }
        Value::Object(prop)
    }

    fn coerce(&self, value: &Value) -> Result<Value, String> {
        let coerced = match self.kind {
            FieldKind::String => value.as_str().map(|s| json!(s)),
            FieldKind::Integer if value.is_u64() && !value.is_i64() => {
                return Err("integer out of range".to_string());
            }
            FieldKind::Integer => coerce_integer(value),
            FieldKind::Number => coerce_number(value),
            FieldKind::Boolean => coerce_bool(value),
            FieldKind::Array => value.is_array().then(|| value.clone()),
            FieldKind::Object => value.is_object().then(|| value.clone()),
            FieldKind::Any => Some(value.clone()),
        };
        let Some(coerced) = coerced else {
            let expected = self.kind.json_type().unwrap_or("value");
            return Err(format!("expected {expected}, got {}", type_name(value)));
        };
        self.check_constraints(&coerced)?;
        Ok(coerced)
    }

    fn check_constraints(&self, value: &Value) -> Result<(), String> {
        if let Some(s) = value.as_str() {
            let len = s.chars().count();
            if let Some(min) = self.min_length.filter(|min| len < *min) {
                return Err(format!("must be at least {min} characters"));
            }
            if let Some(max) = self.max_length.filter(|max| len > *max) {
                return Err(format!("must be at most {max} characters"));
            }
        }
        if let Some(n) = value.as_f64() {
            if let Some(min) = self.minimum.filter(|min| n < *min) {
                return Err(format!("must be >= {min}"));
            }
            if let Some(max) = self.maximum.filter(|max| n > *max) {
                return Err(format!("must be <= {max}"));
            }
        }
        Ok(())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn coerce_integer(value: &Value) -> Option<Value> {
    match value {
        Value::Number(n) if n.is_i64() => Some(value.clone()),
        Value::Number(n) => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
            .map(|f| json!(f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok().map(|i| json!(i)),
        Value::Bool(b) => Some(json!(i64::from(*b))),
        _ => None,
    }
}

fn coerce_number(value: &Value) -> Option<Value> {
    match value {
        Value::Number(_) => Some(value.clone()),
        Value::Bool(b) => Some(json!(i64::from(*b))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> Option<Value> {
    match value {
        Value::Bool(_) => Some(value.clone()),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(Value::Bool(false)),
            Some(1) => Some(Value::Bool(true)),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" | "y" | "t" => Some(Value::Bool(true)),
            "false" | "0" | "no" | "off" | "n" | "f" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

/// A single validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Arguments that passed validation, with coercions and defaults applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    #[must_use]
    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    #[must_use]
    pub fn i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    #[must_use]
    pub fn f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    #[must_use]
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Input contract of a tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSchema {
    fields: Vec<FieldSpec>,
}

impl InputSchema {
    /// A schema that accepts no arguments.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.retain(|f| f.name != field.name);
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Render as a JSON Schema object for `tools/list`.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.to_json_schema()))
            .collect();
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
            .collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Validate and coerce `args`. Unknown keys are dropped.
    ///
    /// # Errors
    ///
    /// Returns every [`ValidationIssue`] found when any field is missing or
    /// fails its type or constraint check.
    pub fn validate(&self, args: &Map<String, Value>) -> Result<Arguments, Vec<ValidationIssue>> {
        let mut out = Map::new();
        let mut issues = Vec::new();

        for field in &self.fields {
            match args.get(&field.name) {
                Some(value) => match field.coerce(value) {
                    Ok(coerced) => {
                        out.insert(field.name.clone(), coerced);
                    }
                    Err(message) => issues.push(ValidationIssue {
                        field: field.name.clone(),
                        message,
                    }),
                },
                None if field.required => issues.push(ValidationIssue {
                    field: field.name.clone(),
                    message: "field required".to_string(),
                }),
                None => {
                    if let Some(default) = &field.default {
                        out.insert(field.name.clone(), default.clone());
                    }
                }
            }
        }

        if issues.is_empty() {
            Ok(Arguments(out))
        } else {
            Err(issues)
        }
    }
}
