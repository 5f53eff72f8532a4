use serde_json::{json, Value};

use crate::registry::ToolRegistry;
use crate::schema::{Arguments, FieldSpec, InputSchema};
use crate::tool::ToolFailure;

pub(super) const NAME: &str = "echo";

pub(super) fn register(registry: &mut ToolRegistry) {
    registry.register(
        NAME,
        "Echoes back the provided text (useful for testing)",
        InputSchema::empty().field(
            FieldSpec::string("text")
                .required()
                .description("Text to echo back"),
        ),
        echo,
    );
}

fn echo(args: &Arguments) -> Result<Value, ToolFailure> {
    let text = args
        .str("text")
        .ok_or_else(|| ToolFailure::new("MissingArgument", "'text' was not provided"))?;
    Ok(json!({
        "content": text,
        "structuredContent": { "text": text },
    }))
}
