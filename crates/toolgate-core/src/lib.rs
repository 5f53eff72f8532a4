pub mod client;
pub mod error;
pub mod traits;
pub mod types;

pub use client::PlaceholderClient;
pub use error::Error;
pub use traits::GenerationClient;
pub use types::{Generation, ModelTier, ModelTimeouts};
