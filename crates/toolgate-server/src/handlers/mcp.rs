use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde_json::Value;

use toolgate_mcp::jsonrpc::{INVALID_REQUEST, PARSE_ERROR};
use toolgate_mcp::{JsonRpcRequest, JsonRpcResponse, RequestId};

use crate::app_state::AppState;

/// Handle a JSON-RPC request on `/mcp`.
///
/// Malformed payloads are answered here with a 400; anything that parses as
/// a request goes to the dispatcher and is answered with a 200, whether the
/// response carries a result or an error.
pub async fn mcp_request(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<JsonRpcResponse>) {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("unparseable MCP payload: {e}");
            return bad_request(RequestId::invalid(), PARSE_ERROR, format!("Parse error: {e}"));
        }
    };

    // Echo the caller's id in the rejection when it is usable.
    let request_id = payload
        .get("id")
        .and_then(RequestId::from_value)
        .unwrap_or_else(RequestId::invalid);

    let kind = rejection_kind(&payload);
    let req: JsonRpcRequest = match serde_json::from_value(payload) {
        Ok(req) => req,
        Err(e) => {
            tracing::warn!(id = %request_id, kind, "invalid JSON-RPC request: {e}");
            return bad_request(
                request_id,
                INVALID_REQUEST,
                format!("Invalid JSON-RPC request: {kind}"),
            );
        }
    };

    tracing::info!(id = %req.id, method = %req.method, "MCP request");
    let response = state.dispatcher.dispatch(&req);
    (StatusCode::OK, Json(response))
}

/// Short name for what is wrong with a payload that failed to deserialize.
/// The serde message stays in the log.
fn rejection_kind(payload: &Value) -> &'static str {
    let Some(obj) = payload.as_object() else {
        return "NotAnObject";
    };
    match obj.get("jsonrpc") {
        None => return "MissingVersion",
        Some(v) if *v != "2.0" => return "UnsupportedVersion",
        Some(_) => {}
    }
    match obj.get("id") {
        None | Some(Value::Null) => return "MissingId",
        Some(id) if RequestId::from_value(id).is_none() => return "InvalidId",
        Some(_) => {}
    }
    match obj.get("method") {
        None => "MissingMethod",
        Some(Value::String(_)) => "ValidationError",
        Some(_) => "InvalidMethod",
    }
}

fn bad_request(
    id: RequestId,
    code: i32,
    message: String,
) -> (StatusCode, Json<JsonRpcResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(JsonRpcResponse::failure(id, code, message, None)),
    )
}
