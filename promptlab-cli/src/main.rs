//! Promptlab explorer - submits one prompt under several sampling
//! configurations and compares the outputs.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

mod explorer;
mod relay;
mod table;

use explorer::{BatchSpec, Relay, run_configs};
use promptlab_core::params::{FieldValue, RawPromptConfig};
use promptlab_core::types::StopSequences;
use relay::HttpRelay;

#[derive(Debug, Parser)]
#[command(
    name = "promptlab",
    about = "Compare completion-API outputs across sampling configurations",
    version = env!("CARGO_PKG_VERSION")
)]
struct ExplorerArgs {
    /// Base URL of the relay server
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    relay_url: String,

    /// JSON batch file: {"systemPrompt", "userPrompt", "configs": [...]}.
    /// When given, the single-configuration flags below are ignored.
    #[arg(long)]
    batch: Option<PathBuf>,

    #[arg(
        long,
        default_value = "You are a helpful assistant that writes product descriptions."
    )]
    system_prompt: String,

    #[arg(long, default_value = "Write a product description for an iPhone.")]
    user_prompt: String,

    /// Model for the single default configuration
    #[arg(long, default_value = "gpt-4")]
    model: String,

    #[arg(long, default_value = "0.7")]
    temperature: String,

    #[arg(long, default_value = "150")]
    max_tokens: String,

    #[arg(long, default_value = "0")]
    presence_penalty: String,

    #[arg(long, default_value = "0")]
    frequency_penalty: String,

    /// Optional stop sequence
    #[arg(long)]
    stop: Option<String>,

    /// After the batch, ask the relay to reflect on how the outputs differ
    #[arg(long)]
    reflect: bool,
}

fn load_batch(args: &ExplorerArgs) -> anyhow::Result<BatchSpec> {
    if let Some(path) = &args.batch {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read batch file: {}", path.display()))?;
        let spec: BatchSpec = serde_json::from_slice(&bytes).context("decode batch JSON")?;
        return Ok(spec);
    }

    // No batch file: one configuration assembled from the flags, the same
    // shape a single form row would submit.
    let config = RawPromptConfig {
        model: args.model.clone(),
        temperature: FieldValue::Text(args.temperature.clone()),
        max_tokens: FieldValue::Text(args.max_tokens.clone()),
        presence_penalty: FieldValue::Text(args.presence_penalty.clone()),
        frequency_penalty: FieldValue::Text(args.frequency_penalty.clone()),
        stop: args.stop.clone().map(StopSequences::One),
    };

    Ok(BatchSpec::single(
        args.system_prompt.clone(),
        args.user_prompt.clone(),
        config,
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ExplorerArgs::parse();

    let batch = load_batch(&args)?;
    let configs = batch.parse_configs()?;

    let relay = HttpRelay::new(args.relay_url.clone());
    println!(
        "Submitting {} configuration(s) via {}",
        configs.len(),
        args.relay_url
    );

    let results = run_configs(&relay, &batch.system_prompt, &batch.user_prompt, &configs).await;
    print!("{}", table::render_results(&results));

    if args.reflect {
        println!("\nReflection");
        match relay.analyze(&results).await {
            Ok(reflection) => println!("{reflection}"),
            Err(e) => println!("Error: {e:#}"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn parse(args: &[&str]) -> ExplorerArgs {
        ExplorerArgs::try_parse_from(args).expect("arguments should parse")
    }

    #[test]
    fn defaults_build_a_single_configuration() {
        let args = parse(&["promptlab"]);
        let batch = load_batch(&args).unwrap();

        assert_eq!(batch.configs.len(), 1);
        let configs = batch.parse_configs().unwrap();
        assert_eq!(configs[0].model, "gpt-4");
        assert_eq!(configs[0].temperature, 0.7);
        assert_eq!(configs[0].max_tokens, 150);
        assert_eq!(configs[0].stop, None);
    }

    #[test]
    fn flag_values_are_coerced_like_form_input() {
        let args = parse(&[
            "promptlab",
            "--temperature",
            "1.2",
            "--max-tokens",
            "50",
            "--stop",
            "END",
        ]);
        let configs = load_batch(&args).unwrap().parse_configs().unwrap();

        assert_eq!(configs[0].temperature, 1.2);
        assert_eq!(configs[0].max_tokens, 50);
        assert_eq!(configs[0].stop, Some(StopSequences::One("END".into())));
    }

    #[test]
    fn malformed_flag_value_fails_the_submission() {
        let args = parse(&["promptlab", "--temperature", "warm"]);
        let batch = load_batch(&args).unwrap();
        assert!(batch.parse_configs().is_err());
    }

    #[test]
    fn batch_file_overrides_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "systemPrompt": "You are terse.",
                "userPrompt": "Write a haiku about rain",
                "configs": [
                    {{"model": "gpt-4", "temperature": "0.0", "max_tokens": "50",
                      "presence_penalty": "0", "frequency_penalty": "0"}},
                    {{"model": "gpt-4", "temperature": "1.2", "max_tokens": "50",
                      "presence_penalty": "0", "frequency_penalty": "0"}}
                ]
            }}"#
        )
        .unwrap();

        let args = parse(&[
            "promptlab",
            "--batch",
            file.path().to_str().unwrap(),
            "--user-prompt",
            "ignored",
        ]);
        let batch = load_batch(&args).unwrap();

        assert_eq!(batch.user_prompt, "Write a haiku about rain");
        let configs = batch.parse_configs().unwrap();
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].temperature, 0.0);
        assert_eq!(configs[1].temperature, 1.2);
    }

    #[test]
    fn missing_batch_file_errors_with_path() {
        let args = parse(&["promptlab", "--batch", "/nonexistent/batch.json"]);
        let err = load_batch(&args).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/batch.json"));
    }
}
