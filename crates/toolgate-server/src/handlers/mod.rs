mod health;
mod mcp;

pub use health::healthz;
pub use mcp::mcp_request;
