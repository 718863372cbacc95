use promptlab_core::types::PromptConfig;
use promptlab_engine::traits::{Completion, CompletionProvider};
use promptlab_providers::openai_compatible::{
    ChatMessage, OpenAiCompatibleChatConfig, build_chat_completions_request,
};
use promptlab_providers::parse::parse_chat_completion;
use promptlab_providers::runtime;

/// The real completion backend: an OpenAI-compatible `/chat/completions`
/// endpoint reached over HTTP.
#[derive(Debug, Clone, Default)]
pub struct OpenAiCompatibleCompletions;

#[async_trait::async_trait]
impl CompletionProvider for OpenAiCompatibleCompletions {
    async fn complete(
        &self,
        base_url: &str,
        api_key: &str,
        config: &PromptConfig,
        system_message: &str,
        user_message: &str,
    ) -> anyhow::Result<Completion> {
        let cfg = OpenAiCompatibleChatConfig {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        };

        let messages = vec![
            ChatMessage {
                role: "system".into(),
                content: system_message.to_string(),
            },
            ChatMessage {
                role: "user".into(),
                content: user_message.to_string(),
            },
        ];

        let req = build_chat_completions_request(&cfg, config, &messages);
        let resp = runtime::execute(&req).await?;
        if !(200..=299).contains(&resp.status) {
            return Err(anyhow::anyhow!(
                "completion request failed: status={} body={}",
                resp.status,
                String::from_utf8_lossy(&resp.body)
            ));
        }

        let text = parse_chat_completion(&resp.body)?;
        Ok(Completion {
            text,
            provider: "openai-compatible".into(),
            model: config.model.clone(),
        })
    }
}
