// HTTP backend for a text-generation-inference style server.
//
// The fine-tuned model is served by an inference server exposing
// `POST {base}/generate`. We ask for the full text (prompt + completion) so the
// output has the same shape the model produces locally, and the orchestrator
// can cut at the response marker.
//
// Request:  {"inputs": "...", "parameters": {"max_new_tokens": 1200, ...}}
// Response: {"generated_text": "..."}  or  [{"generated_text": "..."}]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::GenerationConfig;
use super::traits::GenerationService;

/// Default address of a locally running inference server.
pub const DEFAULT_GENERATOR_URL: &str = "http://127.0.0.1:8080";

/// Generation service backed by an HTTP inference server.
pub struct TgiGenerator {
    client: Client,
    endpoint: String,
}

impl TgiGenerator {
    /// Create a client for the server at `base_url`. `timeout` bounds the
    /// whole request, including the (slow) generation itself.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: format!("{}/generate", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GenerationService for TgiGenerator {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        let request = GenerateRequest::new(prompt, config);
        let started = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .context("Failed to call generation server")?;

        // Error bodies can echo `inputs` back, so only their size is kept
        if !response.status().is_success() {
            let status = response.status();
            let body_bytes = response.bytes().await.map(|b| b.len()).unwrap_or(0);
            debug!(%status, body_bytes, "Generation server rejected request");
            anyhow::bail!("Generation server returned {}", status);
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse generation server response")?;
        let text = require_completion(prompt, parsed.into_text()?)?;

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            output_chars = text.chars().count(),
            "Generation finished"
        );

        Ok(text)
    }
}

/// The server echoes the prompt ahead of the completion, so an empty
/// generation still comes back as non-empty text. Fail unless something
/// other than whitespace follows the echo; the full text is returned as-is.
fn require_completion(prompt: &str, text: String) -> Result<String> {
    let empty = text
        .strip_prefix(prompt)
        .unwrap_or(&text)
        .trim()
        .is_empty();
    if empty {
        anyhow::bail!("Generation server returned an empty completion");
    }
    Ok(text)
}

// --- Wire types ---

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    parameters: GenerateParameters,
}

#[derive(Debug, Serialize)]
struct GenerateParameters {
    max_new_tokens: u32,
    do_sample: bool,
    temperature: f64,
    top_k: u32,
    top_p: f64,
    use_cache: bool,
    return_full_text: bool,
}

impl<'a> GenerateRequest<'a> {
    fn new(prompt: &'a str, config: &GenerationConfig) -> Self {
        Self {
            inputs: prompt,
            parameters: GenerateParameters {
                max_new_tokens: config.max_new_tokens,
                do_sample: config.do_sample,
                temperature: config.temperature,
                top_k: config.top_k,
                top_p: config.top_p,
                use_cache: config.use_cache,
                return_full_text: true,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// Servers differ on whether they wrap the result in a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerateResponse {
    Single(GeneratedText),
    Batch(Vec<GeneratedText>),
}

impl GenerateResponse {
    fn into_text(self) -> Result<String> {
        match self {
            GenerateResponse::Single(g) => Ok(g.generated_text),
            GenerateResponse::Batch(list) => list
                .into_iter()
                .next()
                .map(|g| g.generated_text)
                .context("Generation server returned an empty result list"),
        }
    }
}
