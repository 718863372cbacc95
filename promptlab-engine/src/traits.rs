use async_trait::async_trait;
use promptlab_core::types::PromptConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub text: String,
    pub provider: String,
    pub model: String,
}

/// The external completion API as a black box: role-tagged messages plus
/// sampling parameters in, generated text (or failure) out.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(
        &self,
        base_url: &str,
        api_key: &str,
        config: &PromptConfig,
        system_message: &str,
        user_message: &str,
    ) -> anyhow::Result<Completion>;
}
