//! Tools shipped with the server.

mod echo;
mod health;

pub use health::Uptime;

use crate::registry::ToolRegistry;

/// Register every built-in tool, in a fixed order.
///
/// Must run before the transport starts accepting requests.
pub fn register_builtin_tools(registry: &mut ToolRegistry, uptime: Uptime) {
    health::register(registry, uptime);
    echo::register(registry);
}
