use crate::traits::{Completion, CompletionProvider};
use promptlab_core::params::{self, ParamError};
use promptlab_core::prompt::{
    build_generation_messages, build_reflection_prompt, reflection_config,
};
use promptlab_core::types::{GenerationResult, PromptConfig};
use std::sync::Arc;
use thiserror::Error;

/// Minimum number of results a reflection needs to contrast.
pub const MIN_RESULTS_FOR_REFLECTION: usize = 2;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ParamError),

    #[error("at least {MIN_RESULTS_FOR_REFLECTION} generation results are required for a reflection, got {got}")]
    NotEnoughResults { got: usize },

    #[error("completion request failed")]
    Upstream(#[source] anyhow::Error),
}

impl EngineError {
    /// Distinguishes caller mistakes (reject with 400) from upstream
    /// failures (surface as 500).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidConfig(_) | EngineError::NotEnoughResults { .. }
        )
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub llm_base_url: String,
    pub llm_api_key: String,
}

/// The relay between clients and the completion API. Constructed once at
/// process start and passed around explicitly; holds no mutable state.
pub struct PlaygroundEngine {
    cfg: EngineConfig,
    llm: Arc<dyn CompletionProvider>,
}

impl PlaygroundEngine {
    pub fn new(cfg: EngineConfig, llm: Arc<dyn CompletionProvider>) -> Self {
        Self { cfg, llm }
    }

    pub fn base_url(&self) -> &str {
        &self.cfg.llm_base_url
    }

    /// Forwards one configuration to the completion API as a two-message
    /// exchange (system role + user role), all sampling parameters verbatim.
    pub async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        config: &PromptConfig,
    ) -> Result<Completion, EngineError> {
        params::validate(config)?;

        let built = build_generation_messages(system_prompt, user_prompt);
        self.llm
            .complete(
                &self.cfg.llm_base_url,
                &self.cfg.llm_api_key,
                config,
                &built.system_message,
                &built.user_message,
            )
            .await
            .map_err(EngineError::Upstream)
    }

    /// Summarizes how a batch of outputs differ. Requires at least two
    /// results; the check happens before any upstream call.
    pub async fn analyze(&self, results: &[GenerationResult]) -> Result<String, EngineError> {
        if results.len() < MIN_RESULTS_FOR_REFLECTION {
            return Err(EngineError::NotEnoughResults {
                got: results.len(),
            });
        }

        let built = build_reflection_prompt(results);
        let completion = self
            .llm
            .complete(
                &self.cfg.llm_base_url,
                &self.cfg.llm_api_key,
                &reflection_config(),
                &built.system_message,
                &built.user_message,
            )
            .await
            .map_err(EngineError::Upstream)?;

        Ok(completion.text)
    }
}
