use crate::explorer::Relay;
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use promptlab_core::types::{GenerationResult, PromptConfig};
use promptlab_providers::request::{Body, HttpRequest};
use promptlab_providers::runtime;
use serde::{Deserialize, Serialize};

/// HTTP client for the relay server's `/api` endpoints.
#[derive(Debug, Clone)]
pub struct HttpRelay {
    base_url: String,
}

#[derive(Debug, Serialize)]
struct GenerateCall<'a> {
    #[serde(rename = "systemPrompt")]
    system_prompt: &'a str,
    #[serde(rename = "userPrompt")]
    user_prompt: &'a str,
    #[serde(flatten)]
    config: &'a PromptConfig,
}

#[derive(Debug, Serialize)]
struct AnalyzeCall<'a> {
    results: &'a [GenerationResult],
}

#[derive(Debug, Deserialize)]
struct GenerateReply {
    output: String,
}

#[derive(Debug, Deserialize)]
struct AnalyzeReply {
    reflection: String,
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

impl HttpRelay {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn post_json(&self, path: &str, body: String) -> anyhow::Result<Vec<u8>> {
        let req = HttpRequest {
            method: "POST".into(),
            url: self.api_url(path),
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: Body::Json(body),
        };

        let resp = runtime::execute(&req).await?;
        if !(200..=299).contains(&resp.status) {
            // Prefer the relay's structured error over a bare status code.
            if let Ok(reply) = serde_json::from_slice::<ErrorReply>(&resp.body) {
                return Err(match reply.details {
                    Some(details) => anyhow!("{}: {}", reply.error, details),
                    None => anyhow!(reply.error),
                });
            }
            return Err(anyhow!(
                "relay returned status {}: {}",
                resp.status,
                String::from_utf8_lossy(&resp.body)
            ));
        }
        Ok(resp.body)
    }
}

#[async_trait]
impl Relay for HttpRelay {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        config: &PromptConfig,
    ) -> anyhow::Result<String> {
        let call = GenerateCall {
            system_prompt,
            user_prompt,
            config,
        };
        let body = serde_json::to_string(&call).context("encode generate request")?;

        let reply = self.post_json("/api/generate", body).await?;
        let reply: GenerateReply =
            serde_json::from_slice(&reply).context("decode generate response")?;
        Ok(reply.output)
    }

    async fn analyze(&self, results: &[GenerationResult]) -> anyhow::Result<String> {
        let body = serde_json::to_string(&AnalyzeCall { results })
            .context("encode analyze request")?;

        let reply = self.post_json("/api/analyze", body).await?;
        let reply: AnalyzeReply =
            serde_json::from_slice(&reply).context("decode analyze response")?;
        Ok(reply.reflection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn generate_posts_the_browser_wire_shape() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"output":"Rain taps the window."}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let relay = HttpRelay::new(server.uri());
        let output = relay
            .generate("You are terse.", "Write a haiku", &PromptConfig::default())
            .await
            .unwrap();
        assert_eq!(output, "Rain taps the window.");

        let requests = server.received_requests().await.unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(payload["systemPrompt"], "You are terse.");
        assert_eq!(payload["userPrompt"], "Write a haiku");
        assert_eq!(payload["model"], "gpt-4");
        assert_eq!(payload["max_tokens"], 150);
        assert!(payload.get("stop").is_none());
    }

    #[tokio::test]
    async fn relay_error_body_becomes_the_error_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(500).set_body_raw(
                r#"{"error":"Failed to generate completion","details":"status=401"}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let relay = HttpRelay::new(server.uri());
        let err = relay
            .generate("s", "u", &PromptConfig::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to generate completion: status=401"
        );
    }

    #[tokio::test]
    async fn analyze_round_trips_results() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/analyze"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"reflection":"They differ."}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let results = vec![
            GenerationResult {
                config: PromptConfig::default(),
                output: "first".into(),
            },
            GenerationResult {
                config: PromptConfig::default(),
                output: "second".into(),
            },
        ];

        let relay = HttpRelay::new(server.uri());
        let reflection = relay.analyze(&results).await.unwrap();
        assert_eq!(reflection, "They differ.");

        let requests = server.received_requests().await.unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(payload["results"].as_array().unwrap().len(), 2);
        assert_eq!(payload["results"][0]["output"], "first");
        assert_eq!(payload["results"][0]["model"], "gpt-4");
    }
}
