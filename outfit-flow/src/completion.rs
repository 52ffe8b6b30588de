use async_trait::async_trait;

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Single-prompt text completion service
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Name shown in log lines, e.g. the model id
    fn name(&self) -> &str;

    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

#[cfg(feature = "rig")]
pub use openrouter::OpenRouterCompletion;

#[cfg(feature = "rig")]
mod openrouter {
    use async_trait::async_trait;
    use rig::completion::Prompt;
    use rig::prelude::*;
    use rig::providers::openrouter;

    use super::TextCompletion;

    const STYLIST_PREAMBLE: &str = "You are a fashion stylist AI.";

    /// Completion backed by an OpenRouter-hosted model
    pub struct OpenRouterCompletion {
        agent: rig::agent::Agent<openrouter::CompletionModel>,
        model: String,
    }

    impl OpenRouterCompletion {
        pub fn new(api_key: &str, model: &str) -> Self {
            let client = openrouter::Client::new(api_key);
            let agent = client.agent(model).preamble(STYLIST_PREAMBLE).temperature(0.0).build();
            Self {
                agent,
                model: model.to_string(),
            }
        }
    }

    #[async_trait]
    impl TextCompletion for OpenRouterCompletion {
        fn name(&self) -> &str {
            &self.model
        }

        async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
            let response = self.agent.prompt(prompt).await?;
            Ok(response)
        }
    }
}
