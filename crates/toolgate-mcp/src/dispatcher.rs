use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::jsonrpc::{
    JsonRpcRequest, JsonRpcResponse, Params, RequestId, INTERNAL_ERROR, INVALID_PARAMS,
    METHOD_NOT_FOUND,
};
use crate::registry::{CallError, ToolRegistry};

pub const TOOLS_LIST: &str = "tools/list";
pub const TOOLS_CALL: &str = "tools/call";

/// Routes JSON-RPC methods onto the tool registry.
///
/// Every request yields exactly one response. Failures, including panics in
/// tool handlers, come back as error responses instead of propagating.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn dispatch(&self, req: &JsonRpcRequest) -> JsonRpcResponse {
        match panic::catch_unwind(AssertUnwindSafe(|| self.route(req))) {
            Ok(response) => response,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(id = %req.id, method = %req.method, "unhandled error during dispatch: {message}");
                internal_error(req.id.clone(), "panic", &message)
            }
        }
    }

    fn route(&self, req: &JsonRpcRequest) -> JsonRpcResponse {
        match req.method.as_str() {
            TOOLS_LIST => self.handle_tools_list(req),
            TOOLS_CALL => self.handle_tools_call(req),
            other => JsonRpcResponse::failure(
                req.id.clone(),
                METHOD_NOT_FOUND,
                format!("Unknown method: {other}"),
                None,
            ),
        }
    }

    fn handle_tools_list(&self, req: &JsonRpcRequest) -> JsonRpcResponse {
        let tools = self.registry.list();
        JsonRpcResponse::success(req.id.clone(), json!({ "tools": tools }))
    }

    fn handle_tools_call(&self, req: &JsonRpcRequest) -> JsonRpcResponse {
        let Some(Params::Object(params)) = &req.params else {
            return JsonRpcResponse::failure(
                req.id.clone(),
                INVALID_PARAMS,
                "Expected params object with 'name' and 'arguments'",
                None,
            );
        };

        let empty = Map::new();
        let name = params.get("name").and_then(Value::as_str);
        let arguments = match params.get("arguments") {
            None => Some(&empty),
            Some(value) => value.as_object(),
        };
        let (Some(name), Some(arguments)) = (name, arguments) else {
            return JsonRpcResponse::failure(
                req.id.clone(),
                INVALID_PARAMS,
                "Invalid 'name' or 'arguments' types",
                None,
            );
        };

        tracing::debug!(id = %req.id, tool = name, "calling tool");
        match self.registry.call(name, arguments) {
            Ok(result) => JsonRpcResponse::success(req.id.clone(), Value::from(result)),
            Err(err) => call_error_response(&req.id, err),
        }
    }
}

fn call_error_response(id: &RequestId, err: CallError) -> JsonRpcResponse {
    match err {
        CallError::NotFound(_) => {
            JsonRpcResponse::failure(id.clone(), INVALID_PARAMS, err.to_string(), None)
        }
        CallError::InvalidArguments { ref issues, .. } => {
            let data = json!(issues);
            JsonRpcResponse::failure(id.clone(), INVALID_PARAMS, err.to_string(), Some(data))
        }
        CallError::MalformedResult(ref name) => {
            tracing::error!(id = %id, tool = %name, "tool returned a malformed result");
            JsonRpcResponse::failure(id.clone(), INTERNAL_ERROR, err.to_string(), None)
        }
        CallError::Handler { name, source } => {
            tracing::error!(id = %id, tool = %name, "tool failed: {source}");
            internal_error(id.clone(), &source.kind, &source.message)
        }
    }
}

fn internal_error(id: RequestId, kind: &str, message: &str) -> JsonRpcResponse {
    JsonRpcResponse::failure(
        id,
        INTERNAL_ERROR,
        "Internal server error",
        Some(json!({ "exceptionKind": kind, "message": message })),
    )
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
