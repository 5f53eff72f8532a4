use std::time::{Duration, Instant};

use serde_json::{json, Value};

use crate::registry::ToolRegistry;
use crate::schema::{Arguments, InputSchema};
use crate::tool::ToolFailure;

pub(super) const NAME: &str = "health_check";

/// Monotonic process start time.
#[derive(Debug, Clone, Copy)]
pub struct Uptime {
    started: Instant,
}

impl Uptime {
    /// Capture the current instant as the process start.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

pub(super) fn register(registry: &mut ToolRegistry, uptime: Uptime) {
    registry.register(
        NAME,
        "Report service health status and uptime in seconds",
        InputSchema::empty(),
        move |_: &Arguments| -> Result<Value, ToolFailure> { Ok(report(uptime.elapsed())) },
    );
}

fn report(elapsed: Duration) -> Value {
    let uptime = elapsed.as_secs();
    json!({
        "content": format!("Service healthy. Uptime: {uptime}s"),
        "structuredContent": {
            "status": "ok",
            "uptime_seconds": uptime,
        },
    })
}
