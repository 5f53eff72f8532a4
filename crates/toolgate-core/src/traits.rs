use async_trait::async_trait;

use crate::error::Error;
use crate::types::Generation;

/// Client for an external text-generation model.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generate a completion for `prompt` with the named model.
    async fn generate(&self, model: &str, prompt: &str) -> Result<Generation, Error>;
}
