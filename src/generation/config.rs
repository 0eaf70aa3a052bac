// Sampling parameters passed through to the generation backend.

use serde::{Deserialize, Serialize};

/// Generation settings for every allowed query.
///
/// These are policy knobs, not logic: the orchestrator hands them to the
/// backend untouched. Defaults match what the model was tuned and evaluated
/// with; `Config::load` lets a deployment override each field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Upper bound on generated tokens (default 1200)
    pub max_new_tokens: u32,
    /// Sample instead of greedy decoding (default true)
    pub do_sample: bool,
    /// Softmax temperature (default 0.7)
    pub temperature: f64,
    /// Keep only the k most likely tokens (default 50)
    pub top_k: u32,
    /// Nucleus sampling cutoff (default 0.95)
    pub top_p: f64,
    /// Reuse the key/value cache between decoding steps (default true)
    pub use_cache: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_new_tokens: 1200,
            do_sample: true,
            temperature: 0.7,
            top_k: 50,
            top_p: 0.95,
            use_cache: true,
        }
    }
}
