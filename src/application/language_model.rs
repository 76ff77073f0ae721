// Port to the hosted language model used by the prompt-template flows
use async_trait::async_trait;

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Model identifier for logging
    fn model(&self) -> &str;

    /// Run one completion and return the raw text the model produced
    async fn complete(&self, system: &str, prompt: &str) -> anyhow::Result<String>;
}
