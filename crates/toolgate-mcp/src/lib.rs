pub mod builtin;
pub mod dispatcher;
pub mod jsonrpc;
pub mod registry;
pub mod schema;
pub mod tool;

pub use builtin::{register_builtin_tools, Uptime};
pub use dispatcher::Dispatcher;
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId};
pub use registry::{CallError, ToolRegistry};
pub use schema::{Arguments, FieldKind, FieldSpec, InputSchema};
pub use tool::{ToolDefinition, ToolFailure, ToolHandler, ToolResult};
