// Fine-tuning dataset formatting.
//
// Turns rows of the medical reasoning SFT dataset into the single `text`
// field the trainer consumes: the prompt template with all three slots filled
// (question, chain-of-thought, answer) followed by the tokenizer's EOS token.
// Training itself happens outside this crate.
//
// Input:  JSONL, one {"Question", "Complex_CoT", "Response"} object per line
// Output: JSONL, one {"text": "..."} object per line

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::prompt::PromptTemplate;

/// EOS token of the DeepSeek-R1 Llama distill tokenizer.
pub const DEFAULT_EOS_TOKEN: &str = "<｜end▁of▁sentence｜>";

/// One row of the source dataset. Fields are optional so a malformed row can
/// be counted and skipped instead of aborting the whole file.
#[derive(Debug, Deserialize)]
pub struct TrainingRecord {
    #[serde(rename = "Question")]
    pub question: Option<String>,
    #[serde(rename = "Complex_CoT")]
    pub complex_cot: Option<String>,
    #[serde(rename = "Response")]
    pub response: Option<String>,
}

#[derive(Debug, Serialize)]
struct FormattedExample<'a> {
    text: &'a str,
}

/// Counts from a formatting run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormatStats {
    pub written: usize,
    pub skipped: usize,
}

/// Format one record, or `None` if any of the three fields is missing.
pub fn format_record(
    template: &PromptTemplate,
    record: &TrainingRecord,
    eos_token: &str,
) -> Option<String> {
    let question = record.question.as_deref()?;
    let cot = record.complex_cot.as_deref()?;
    let response = record.response.as_deref()?;
    let mut text = template.render(question, cot, response);
    text.push_str(eos_token);
    Some(text)
}

/// Stream JSONL records from `input` to `output`. Blank lines are ignored;
/// lines that aren't valid records, or lack a field, are skipped and counted.
pub fn format_jsonl<R: BufRead, W: Write>(
    template: &PromptTemplate,
    input: R,
    mut output: W,
    eos_token: &str,
) -> Result<FormatStats> {
    let mut stats = FormatStats::default();

    for (index, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read input line {}", index + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        let formatted = serde_json::from_str::<TrainingRecord>(&line)
            .ok()
            .and_then(|record| format_record(template, &record, eos_token));

        match formatted {
            Some(text) => {
                serde_json::to_writer(&mut output, &FormattedExample { text: &text })
                    .context("Failed to serialize formatted example")?;
                output.write_all(b"\n").context("Failed to write output")?;
                stats.written += 1;
            }
            None => {
                debug!(line = index + 1, "Skipping incomplete dataset row");
                stats.skipped += 1;
            }
        }
    }

    output.flush().context("Failed to flush output")?;
    info!(
        written = stats.written,
        skipped = stats.skipped,
        "Formatted training dataset"
    );
    Ok(stats)
}
