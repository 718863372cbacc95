use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// One or several stop sequences, as the completion API accepts either shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StopSequences {
    One(String),
    Many(Vec<String>),
}

impl StopSequences {
    // "Empty" mirrors the original relay's truthiness check: a blank string
    // or a list without any non-blank entry is treated as no stop at all.
    pub fn is_empty(&self) -> bool {
        match self {
            StopSequences::One(s) => s.trim().is_empty(),
            StopSequences::Many(v) => v.iter().all(|s| s.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<StopSequences>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".into(),
            temperature: 0.7,
            max_tokens: 150,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
            stop: None,
        }
    }
}

impl PromptConfig {
    /// The stop value to forward upstream, if any: blank sequences count as absent.
    pub fn effective_stop(&self) -> Option<&StopSequences> {
        self.stop.as_ref().filter(|s| !s.is_empty())
    }
}

/// A configuration together with what the model produced for it.
///
/// The config fields are flattened so the wire shape matches what the
/// browser/CLI client accumulates per configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    #[serde(flatten)]
    pub config: PromptConfig,
    pub output: String,
}

impl GenerationResult {
    /// Captures one relay call as a value: a failure becomes an inline
    /// `Error: ...` output so the rest of the batch keeps going.
    pub fn from_outcome(config: PromptConfig, outcome: Result<String, impl Display>) -> Self {
        let output = match outcome {
            Ok(text) => text,
            Err(e) => format!("Error: {e}"),
        };
        Self { config, output }
    }

    pub fn is_error(&self) -> bool {
        self.output.starts_with("Error: ")
    }
}
