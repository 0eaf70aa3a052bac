// Generation service trait: the seam between the gate and the model.
//
// The model itself (DeepSeek-R1 distill + LoRA adapter, quantized, on a GPU)
// lives outside this crate. Anything that turns a prompt into text can sit
// behind this trait: an HTTP inference server, a local runtime, or a stub in
// tests.

use anyhow::Result;
use async_trait::async_trait;

use super::config::GenerationConfig;

/// Trait for turning a formatted prompt into raw model output.
///
/// Implementations must be async because the call is slow and usually goes
/// over the network. Dropping the returned future cancels the call.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generate text for `prompt`. The returned string is the raw decoded
    /// output, which may echo the prompt before the response marker.
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String>;
}

/// Generator used when the model must not be reached (e.g. `check`).
/// Fails if actually called so nothing silently produces a fake answer.
pub struct NoopGenerator;

#[async_trait]
impl GenerationService for NoopGenerator {
    async fn generate(&self, _prompt: &str, _config: &GenerationConfig) -> Result<String> {
        anyhow::bail!("NoopGenerator should never be called: no generation backend configured")
    }
}
