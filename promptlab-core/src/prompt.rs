use crate::types::{GenerationResult, PromptConfig};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

// The reflection step deliberately ignores user-selected configurations and
// always samples at a fixed model and temperature.
pub const REFLECTION_MODEL: &str = "gpt-4";
pub const REFLECTION_TEMPERATURE: f32 = 0.7;
pub const REFLECTION_MAX_TOKENS: u32 = 512;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrompt {
    pub system_message: String,
    pub user_message: String,
    pub messages: Vec<LlmMessage>,
}

/// The two-message exchange forwarded verbatim to the completion API.
pub fn build_generation_messages(system_prompt: &str, user_prompt: &str) -> BuiltPrompt {
    let messages = vec![
        LlmMessage {
            role: "system".into(),
            content: system_prompt.to_string(),
        },
        LlmMessage {
            role: "user".into(),
            content: user_prompt.to_string(),
        },
    ];

    BuiltPrompt {
        system_message: system_prompt.to_string(),
        user_message: user_prompt.to_string(),
        messages,
    }
}

/// One result rendered as a labelled block for the reflection prompt
/// (and for terminal display).
pub fn format_result_block(result: &GenerationResult) -> String {
    let c = &result.config;
    let mut block = String::new();
    let _ = writeln!(block, "Model: {}", c.model);
    let _ = writeln!(block, "Temperature: {}", c.temperature);
    let _ = writeln!(block, "Max tokens: {}", c.max_tokens);
    let _ = writeln!(block, "Presence penalty: {}", c.presence_penalty);
    let _ = writeln!(block, "Frequency penalty: {}", c.frequency_penalty);
    let _ = writeln!(block, "Output:\n{}", result.output);
    block
}

/// Builds the cross-output analysis prompt: every collected result is
/// serialized into the user message, and the system message pins the shape
/// of the answer to two paragraphs.
pub fn build_reflection_prompt(results: &[GenerationResult]) -> BuiltPrompt {
    let system = "<SYSTEM_INSTRUCTIONS>\n\
You are analyzing outputs generated by a language model under different sampling \
configurations for the same prompt. Do not continue or rewrite the outputs.\n\n\
Write exactly two paragraphs: the first contrasts the outputs inside \
<GENERATIONS>, the second explains the likely cause of the differences given \
the varied parameters (temperature, max tokens, presence/frequency penalty).\n\
</SYSTEM_INSTRUCTIONS>"
        .to_string();

    let mut user = String::from("<GENERATIONS>\n");
    for (i, result) in results.iter().enumerate() {
        let _ = writeln!(user, "--- Generation {} ---", i + 1);
        user.push_str(&format_result_block(result));
        user.push('\n');
    }
    user.push_str("</GENERATIONS>");

    let messages = vec![
        LlmMessage {
            role: "system".into(),
            content: system.clone(),
        },
        LlmMessage {
            role: "user".into(),
            content: user.clone(),
        },
    ];

    BuiltPrompt {
        system_message: system,
        user_message: user,
        messages,
    }
}

/// The fixed sampling configuration used for every reflection call.
pub fn reflection_config() -> PromptConfig {
    PromptConfig {
        model: REFLECTION_MODEL.into(),
        temperature: REFLECTION_TEMPERATURE,
        max_tokens: REFLECTION_MAX_TOKENS,
        presence_penalty: 0.0,
        frequency_penalty: 0.0,
        stop: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(model: &str, temperature: f32, output: &str) -> GenerationResult {
        GenerationResult {
            config: PromptConfig {
                model: model.into(),
                temperature,
                ..PromptConfig::default()
            },
            output: output.into(),
        }
    }

    #[test]
    fn generation_messages_are_system_then_user() {
        let built = build_generation_messages("You are terse.", "Write a haiku about rain");

        assert_eq!(built.messages.len(), 2);
        assert_eq!(built.messages[0].role, "system");
        assert_eq!(built.messages[0].content, "You are terse.");
        assert_eq!(built.messages[1].role, "user");
        assert_eq!(built.messages[1].content, "Write a haiku about rain");
    }

    #[test]
    fn result_block_names_every_parameter() {
        let block = format_result_block(&result("gpt-4", 1.2, "Soft rain falls."));

        assert!(block.contains("Model: gpt-4"));
        assert!(block.contains("Temperature: 1.2"));
        assert!(block.contains("Max tokens: 150"));
        assert!(block.contains("Presence penalty: 0"));
        assert!(block.contains("Frequency penalty: 0"));
        assert!(block.contains("Soft rain falls."));
    }

    #[test]
    fn reflection_prompt_serializes_all_results() {
        let results = vec![
            result("gpt-4", 0.0, "first output"),
            result("gpt-4", 1.2, "second output"),
        ];
        let built = build_reflection_prompt(&results);

        assert!(built.system_message.contains("two paragraphs"));
        assert!(built.user_message.contains("--- Generation 1 ---"));
        assert!(built.user_message.contains("--- Generation 2 ---"));
        assert!(built.user_message.contains("first output"));
        assert!(built.user_message.contains("second output"));
        assert!(built.user_message.contains("Temperature: 1.2"));
    }

    #[test]
    fn reflection_config_is_fixed() {
        let config = reflection_config();
        assert_eq!(config.model, REFLECTION_MODEL);
        assert_eq!(config.temperature, REFLECTION_TEMPERATURE);
        assert_eq!(config.stop, None);
    }
}
