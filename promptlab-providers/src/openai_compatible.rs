use crate::request::{Body, HttpRequest};
use promptlab_core::types::{PromptConfig, StopSequences};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiCompatibleChatConfig {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Builds a `/chat/completions` request carrying the sampling parameters of
/// one [`PromptConfig`] verbatim. `stop` is attached only when a non-empty
/// value is present.
pub fn build_chat_completions_request(
    cfg: &OpenAiCompatibleChatConfig,
    config: &PromptConfig,
    messages: &[ChatMessage],
) -> HttpRequest {
    let url = join_url(&cfg.base_url, "/chat/completions");

    let mut payload = json!({
        "model": config.model,
        "messages": messages.iter().map(|m| json!({"role": m.role, "content": m.content})).collect::<Vec<_>>(),
        "temperature": config.temperature,
        "max_tokens": config.max_tokens,
        "presence_penalty": config.presence_penalty,
        "frequency_penalty": config.frequency_penalty,
    });

    if let Some(stop) = config.effective_stop() {
        let value = match stop {
            StopSequences::One(s) => json!(s),
            StopSequences::Many(v) => json!(v),
        };
        payload["stop"] = value;
    }

    HttpRequest {
        method: "POST".into(),
        url,
        headers: vec![
            ("Content-Type".into(), "application/json".into()),
            ("Authorization".into(), format!("Bearer {}", cfg.api_key)),
        ],
        body: Body::Json(payload.to_string()),
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}
