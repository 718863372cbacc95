use anyhow::Context;
use async_trait::async_trait;
use promptlab_core::params::RawPromptConfig;
use promptlab_core::types::{GenerationResult, PromptConfig};
use serde::Deserialize;

/// The relay as the explorer sees it: one generate call per configuration,
/// one analyze call per batch.
#[async_trait]
pub trait Relay: Send + Sync {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        config: &PromptConfig,
    ) -> anyhow::Result<String>;

    async fn analyze(&self, results: &[GenerationResult]) -> anyhow::Result<String>;
}

/// One submission as loaded from a batch file (or assembled from flags):
/// the prompts plus an ordered list of form-shaped configurations.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchSpec {
    #[serde(rename = "systemPrompt")]
    pub system_prompt: String,
    #[serde(rename = "userPrompt")]
    pub user_prompt: String,
    pub configs: Vec<RawPromptConfig>,
}

impl BatchSpec {
    pub fn single(system_prompt: String, user_prompt: String, config: RawPromptConfig) -> Self {
        Self {
            system_prompt,
            user_prompt,
            configs: vec![config],
        }
    }

    /// Coerces every configuration up front so a typo fails the submission
    /// before anything is sent.
    pub fn parse_configs(&self) -> anyhow::Result<Vec<PromptConfig>> {
        self.configs
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                raw.parse()
                    .with_context(|| format!("configuration #{}", i + 1))
            })
            .collect()
    }
}

/// Sequentially submits every configuration, awaiting each response before
/// issuing the next. A failed call is captured in that result's `output`;
/// the remaining configurations still run.
pub async fn run_configs(
    relay: &dyn Relay,
    system_prompt: &str,
    user_prompt: &str,
    configs: &[PromptConfig],
) -> Vec<GenerationResult> {
    let mut results = Vec::with_capacity(configs.len());
    for config in configs {
        let outcome = relay
            .generate(system_prompt, user_prompt, config)
            .await
            .map_err(|e| format!("{e:#}"));
        results.push(GenerationResult::from_outcome(config.clone(), outcome));
    }
    results
}
