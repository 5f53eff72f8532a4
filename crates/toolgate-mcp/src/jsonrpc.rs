use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Standard JSON-RPC error codes.
pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

/// The `jsonrpc` member. Only `"2.0"` is accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Version {
    #[default]
    #[serde(rename = "2.0")]
    V2,
}

/// A request id: a string or an integer, never null.
///
/// Integers of any width are accepted, as are floats with no fractional
/// part (`1.0` becomes `1`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(Number),
    String(String),
}

impl RequestId {
    /// Id used when the original request carried no usable id.
    #[must_use]
    pub fn invalid() -> Self {
        Self::String("invalid".to_string())
    }

    /// Recover an id from an arbitrary JSON value, if it has an acceptable type.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(Self::Number(n.clone())),
            Value::Number(n) => integral_float(n).map(|i| Self::Number(i.into())),
            _ => None,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn integral_float(n: &Number) -> Option<i64> {
    n.as_f64()
        .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
        .map(|f| f as i64)
}

impl<'de> Deserialize<'de> for RequestId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value)
            .ok_or_else(|| de::Error::custom("id must be a string or an integer"))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => n.fmt(f),
            Self::String(s) => s.fmt(f),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

/// Request parameters: by-name or by-position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Params {
    Object(Map<String, Value>),
    Array(Vec<Value>),
}

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: Version,
    pub id: RequestId,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
}

impl JsonRpcRequest {
    #[must_use]
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>, params: Option<Params>) -> Self {
        Self {
            jsonrpc: Version::V2,
            id: id.into(),
            method: method.into(),
            params,
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Either a result or an error. Serialized as a sibling `result` or `error`
/// member of the response, so a response can never carry both or neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "result")]
    Result(Value),
    #[serde(rename = "error")]
    Error(JsonRpcError),
}

/// A JSON-RPC 2.0 response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: Version,
    pub id: RequestId,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: Version::V2,
            id,
            outcome: Outcome::Result(result),
        }
    }

    /// Create an error response.
    pub fn failure(id: RequestId, code: i32, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            jsonrpc: Version::V2,
            id,
            outcome: Outcome::Error(JsonRpcError {
                code,
                message: message.into(),
                data,
            }),
        }
    }

    #[must_use]
    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Result(value) => Some(value),
            Outcome::Error(_) => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&JsonRpcError> {
        match &self.outcome {
            Outcome::Result(_) => None,
            Outcome::Error(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_request() {
        let json = r#"{
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/list",
            "params": null
        }"#;
        let req: JsonRpcRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.method, "tools/list");
        assert_eq!(req.id, RequestId::from(1));
        assert!(req.params.is_none());
    }

    #[test]
    fn request_with_params() {
        let json = r#"{
            "jsonrpc": "2.0",
            "id": "abc",
            "method": "tools/call",
            "params": {
                "name": "echo",
                "arguments": { "text": "hello" }
            }
        }"#;
        let req: JsonRpcRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.id, RequestId::from("abc"));

        let Some(Params::Object(params)) = req.params else {
            panic!("expected object params");
        };
        assert_eq!(params["name"], "echo");
        assert_eq!(params["arguments"]["text"], "hello");
    }

    #[test]
    fn positional_params_accepted() {
        let json = r#"{"jsonrpc": "2.0", "id": 7, "method": "x", "params": [1, 2]}"#;
        let req: JsonRpcRequest = serde_json::from_str(json).unwrap();
        assert!(matches!(req.params, Some(Params::Array(ref v)) if v.len() == 2));
    }

    #[test]
    fn rejects_missing_version() {
        let json = r#"{"id": "12", "method": "tools/list"}"#;
        assert!(serde_json::from_str::<JsonRpcRequest>(json).is_err());
    }

    #[test]
    fn rejects_wrong_version() {
        let json = r#"{"jsonrpc": "1.0", "id": "12", "method": "tools/list"}"#;
        assert!(serde_json::from_str::<JsonRpcRequest>(json).is_err());
    }

    #[test]
    fn rejects_null_or_missing_id() {
        let missing = r#"{"jsonrpc": "2.0", "method": "tools/list"}"#;
        let null = r#"{"jsonrpc": "2.0", "id": null, "method": "tools/list"}"#;
        assert!(serde_json::from_str::<JsonRpcRequest>(missing).is_err());
        assert!(serde_json::from_str::<JsonRpcRequest>(null).is_err());
    }

    #[test]
    fn rejects_scalar_params() {
        let json = r#"{"jsonrpc": "2.0", "id": 1, "method": "x", "params": "nope"}"#;
        assert!(serde_json::from_str::<JsonRpcRequest>(json).is_err());
    }

    #[test]
    fn success_response() {
        let resp = JsonRpcResponse::success(RequestId::from(1), serde_json::json!({"tools": []}));
        assert!(resp.error().is_none());
        assert!(resp.result().is_some());

        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["id"], 1);
        assert!(json.get("error").is_none());
        assert_eq!(json["result"]["tools"], serde_json::json!([]));
    }

    #[test]
    fn error_response() {
        let resp = JsonRpcResponse::failure(
            RequestId::from("x"),
            METHOD_NOT_FOUND,
            "Method not found",
            None,
        );
        assert!(resp.result().is_none());

        let err = resp.error().unwrap();
        assert_eq!(err.code, METHOD_NOT_FOUND);
        assert_eq!(err.message, "Method not found");

        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("result").is_none());
        assert!(json["error"].get("data").is_none());
    }

    #[test]
    fn response_parses_back() {
        let json = r#"{"jsonrpc":"2.0","id":"9","error":{"code":-32602,"message":"bad","data":[1]}}"#;
        let resp: JsonRpcResponse = serde_json::from_str(json).unwrap();
        let err = resp.error().unwrap();
        assert_eq!(err.code, INVALID_PARAMS);
        assert_eq!(err.data, Some(serde_json::json!([1])));
    }

    #[test]
    fn id_recovery() {
        assert_eq!(RequestId::from_value(&serde_json::json!("a")), Some(RequestId::from("a")));
        assert_eq!(RequestId::from_value(&serde_json::json!(3)), Some(RequestId::from(3)));
        assert_eq!(RequestId::from_value(&serde_json::json!(1.0)), Some(RequestId::from(1)));
        assert_eq!(RequestId::from_value(&serde_json::json!(1.5)), None);
        assert_eq!(RequestId::from_value(&Value::Null), None);
    }

    #[test]
    fn accepts_wide_and_integral_float_ids() {
        let json = r#"{"jsonrpc": "2.0", "id": 1.0, "method": "tools/list"}"#;
        let req: JsonRpcRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.id, RequestId::from(1));

        let json = r#"{"jsonrpc": "2.0", "id": 18446744073709551615, "method": "tools/list"}"#;
        let req: JsonRpcRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.id.to_string(), "18446744073709551615");

        let resp = serde_json::to_value(JsonRpcResponse::success(req.id, Value::Null)).unwrap();
        assert_eq!(resp["id"], serde_json::json!(18_446_744_073_709_551_615_u64));
    }

    #[test]
    fn rejects_fractional_id() {
        let json = r#"{"jsonrpc": "2.0", "id": 1.5, "method": "tools/list"}"#;
        assert!(serde_json::from_str::<JsonRpcRequest>(json).is_err());
    }
}
