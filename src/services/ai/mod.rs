pub mod classifier;
pub mod gemini;

use async_trait::async_trait;

/// Single-shot text generation against an external language model. One
/// request, no streaming, no retries; the orchestrator treats any error as
/// a signal to fall back.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
