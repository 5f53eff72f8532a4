use async_trait::async_trait;

use crate::error::Error;
use crate::traits::GenerationClient;
use crate::types::{Generation, ModelTier, ModelTimeouts};

/// Stand-in generation client. Model names are checked, nothing is called.
pub struct PlaceholderClient {
    api_key: Option<String>,
    timeouts: ModelTimeouts,
}

impl PlaceholderClient {
    #[must_use]
    pub fn new(api_key: Option<String>, timeouts: ModelTimeouts) -> Self {
        Self { api_key, timeouts }
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    #[must_use]
    pub fn timeouts(&self) -> ModelTimeouts {
        self.timeouts
    }
}

impl std::fmt::Debug for PlaceholderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceholderClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

#[async_trait]
impl GenerationClient for PlaceholderClient {
    async fn generate(&self, model: &str, _prompt: &str) -> Result<Generation, Error> {
        let tier = ModelTier::from_model_name(model)?;
        Err(Error::NotImplemented(format!(
            "generation for {tier} models ({}s budget)",
            self.timeouts.for_tier(tier).as_secs()
        )))
    }
}
