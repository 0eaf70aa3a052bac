// Response orchestrator: gate -> prompt -> generate -> strip.
//
// Stateless per call. All collaborators are injected at construction; there
// is no ambient model handle anywhere in the crate.
//
// Nothing here logs or formats the query text into errors. Logs carry only
// the decision, counts and timings.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::RespondError;
use crate::gate::{ContentGate, GateDecision};
use crate::generation::{GenerationConfig, GenerationService};
use crate::prompt::{extract_response, PromptTemplate};

/// Fixed reply for queries the gate blocks.
pub const REFUSAL_MESSAGE: &str = "I'm sorry, I can only respond to medical-related questions.";

/// Default cap on query length, in characters.
pub const DEFAULT_MAX_QUERY_CHARS: usize = 4000;

/// Result of a successful `respond_detailed` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The gate blocked the query; carries no detail about which terms.
    Refused,
    /// The model's answer after marker stripping.
    Answered(String),
}

impl Reply {
    pub fn into_text(self) -> String {
        match self {
            Reply::Refused => REFUSAL_MESSAGE.to_string(),
            Reply::Answered(text) => text,
        }
    }
}

pub struct Responder {
    gate: Arc<ContentGate>,
    template: Arc<PromptTemplate>,
    generator: Arc<dyn GenerationService>,
    generation: GenerationConfig,
    max_query_chars: usize,
}

impl Responder {
    pub fn new(
        gate: Arc<ContentGate>,
        template: Arc<PromptTemplate>,
        generator: Arc<dyn GenerationService>,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            gate,
            template,
            generator,
            generation,
            max_query_chars: DEFAULT_MAX_QUERY_CHARS,
        }
    }

    /// Override the query length cap.
    pub fn with_max_query_chars(mut self, max_query_chars: usize) -> Self {
        self.max_query_chars = max_query_chars;
        self
    }

    /// Answer `query`, or return the refusal string if the gate blocks it.
    pub async fn respond(&self, query: &str) -> Result<String, RespondError> {
        self.respond_detailed(query).await.map(Reply::into_text)
    }

    /// Like `respond`, but keeps "refused" and "answered" apart for hosts
    /// that want to render them differently.
    pub async fn respond_detailed(&self, query: &str) -> Result<Reply, RespondError> {
        self.validate(query)?;

        if let GateDecision::Blocked(matched) = self.gate.evaluate(query) {
            info!(matched_terms = matched.len(), "Query blocked by content gate");
            return Ok(Reply::Refused);
        }
        debug!("Query allowed by content gate");

        let prompt = self.template.render_question(query);
        let started = Instant::now();

        let raw = self
            .generator
            .generate(&prompt, &self.generation)
            .await
            .map_err(|e| {
                warn!(error = %e, "Generation service failed");
                RespondError::Generation(e)
            })?;

        if raw.trim().is_empty() {
            warn!("Generation service returned empty output");
            return Err(RespondError::Generation(anyhow::anyhow!(
                "generation service returned empty output"
            )));
        }

        let answer = extract_response(&raw).to_string();
        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            raw_chars = raw.chars().count(),
            answer_chars = answer.chars().count(),
            "Generated response"
        );

        Ok(Reply::Answered(answer))
    }

    /// Reject input before the gate runs. Never truncates.
    fn validate(&self, query: &str) -> Result<(), RespondError> {
        let chars = query.chars().count();
        if chars > self.max_query_chars {
            return Err(RespondError::InvalidInput(format!(
                "query is {} characters, limit is {}",
                chars, self.max_query_chars
            )));
        }
        Ok(())
    }
}

/// Unwrap an optional query from a host surface (e.g. a JSON field that may
/// be absent or null).
pub fn require_query(query: Option<&str>) -> Result<&str, RespondError> {
    query.ok_or_else(|| RespondError::InvalidInput("query is missing".to_string()))
}
