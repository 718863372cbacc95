use promptlab_core::prompt::format_result_block;
use promptlab_core::types::GenerationResult;
use std::fmt::Write;

const PREVIEW_WIDTH: usize = 48;

/// Comparison table plus full output blocks, ready for the terminal.
pub fn render_results(results: &[GenerationResult]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\nResults");
    let _ = writeln!(
        out,
        "{:<3} {:<14} {:>6} {:>10} {:>9} {:>10}  {}",
        "#", "Model", "Temp", "Max tokens", "Presence", "Frequency", "Output"
    );
    for (i, result) in results.iter().enumerate() {
        let c = &result.config;
        let _ = writeln!(
            out,
            "{:<3} {:<14} {:>6} {:>10} {:>9} {:>10}  {}",
            i + 1,
            c.model,
            c.temperature,
            c.max_tokens,
            c.presence_penalty,
            c.frequency_penalty,
            preview(&result.output)
        );
    }

    for (i, result) in results.iter().enumerate() {
        let _ = writeln!(out, "\n--- Generation {} ---", i + 1);
        out.push_str(&format_result_block(result));
    }

    out
}

/// Single-line abbreviation of an output for the table column.
fn preview(output: &str) -> String {
    let flat: String = output
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if flat.chars().count() <= PREVIEW_WIDTH {
        return flat;
    }
    let cut: String = flat.chars().take(PREVIEW_WIDTH).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptlab_core::types::PromptConfig;

    fn result(temperature: f32, output: &str) -> GenerationResult {
        GenerationResult {
            config: PromptConfig {
                temperature,
                ..PromptConfig::default()
            },
            output: output.into(),
        }
    }

    #[test]
    fn preview_flattens_and_truncates() {
        assert_eq!(preview("short output"), "short output");
        assert_eq!(preview("line one\nline two"), "line one line two");

        let long = "word ".repeat(30);
        let p = preview(&long);
        assert!(p.ends_with("..."));
        assert!(p.chars().count() <= PREVIEW_WIDTH + 3);
    }

    #[test]
    fn table_has_one_row_and_one_block_per_result() {
        let rendered = render_results(&[
            result(0.0, "first output"),
            result(1.2, "second output\nwith a second line"),
        ]);

        assert!(rendered.contains("Model"));
        assert!(rendered.contains("--- Generation 1 ---"));
        assert!(rendered.contains("--- Generation 2 ---"));
        // The table abbreviates, the block keeps the full text.
        assert!(rendered.contains("second output with a second line"));
        assert!(rendered.contains("second output\nwith a second line"));
        assert!(rendered.contains("Temperature: 1.2"));
    }

    #[test]
    fn error_outputs_render_like_any_other() {
        let rendered = render_results(&[result(0.7, "Error: relay unreachable")]);
        assert!(rendered.contains("Error: relay unreachable"));
    }
}
