use std::sync::Arc;

use toolgate_core::{GenerationClient, PlaceholderClient};
use toolgate_mcp::{register_builtin_tools, Dispatcher, ToolRegistry, Uptime};

use crate::auth::ApiKeys;
use crate::config::Settings;

/// Shared application state with injected dependencies.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub api_keys: Arc<ApiKeys>,
    pub generation: Arc<dyn GenerationClient>,
}

impl AppState {
    #[must_use]
    pub fn new(
        registry: ToolRegistry,
        api_keys: ApiKeys,
        generation: Arc<dyn GenerationClient>,
    ) -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher::new(Arc::new(registry))),
            api_keys: Arc::new(api_keys),
            generation,
        }
    }

    /// Build the state the binary serves: built-in tools registered, keys
    /// from settings, placeholder generation client.
    ///
    /// # Errors
    ///
    /// Fails when the configured client keys cannot be parsed.
    pub fn from_settings(settings: &Settings, uptime: Uptime) -> Result<Self, toolgate_core::Error> {
        let mut registry = ToolRegistry::new();
        register_builtin_tools(&mut registry, uptime);

        let generation = PlaceholderClient::new(settings.gemini_api_key.clone(), settings.timeouts());

        Ok(Self::new(
            registry,
            settings.allowed_keys()?,
            Arc::new(generation),
        ))
    }
}
