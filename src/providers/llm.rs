//! LLM provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for text generation against a configured language model
///
/// One handle is constructed at run start and shared read-only by every
/// pipeline stage. Implementations:
/// - `GeminiClient`: Google Generative Language API
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate text for a prompt under the given system instruction
    async fn generate(&self, system: &str, prompt: &str) -> Result<String>;

    /// Check if the provider is reachable and credentialed
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model identifier in use
    fn model(&self) -> &str;
}
