// Completion provider abstraction
//
// The refinement loop treats text generation as an opaque gateway: a request
// goes in, free-form text comes out. Anything that can answer a chat request
// implements `LlmProvider`; the only bundled backend speaks the
// OpenAI-compatible chat completions API.

use anyhow::Result;
use async_trait::async_trait;

pub mod openai;
pub mod types;

pub use openai::OpenAIProvider;
pub use types::{Message, ProviderRequest, ProviderResponse};

/// Trait for LLM providers
///
/// One call is one network round trip. Implementations must not retry
/// internally; the refinement loop owns the retry policy.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a message and get a complete response
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse>;

    /// Get the provider name (e.g., "openai")
    fn name(&self) -> &str;

    /// Get the default model for this provider
    fn default_model(&self) -> &str;
}
