// Text generation: trait-based abstraction over the model backend.
//
// The GenerationService trait defines the interface. TgiGenerator implements
// it against an HTTP inference server hosting the fine-tuned model; tests
// inject their own stubs.

pub mod config;
pub mod tgi;
pub mod traits;

pub use config::GenerationConfig;
pub use traits::{GenerationService, NoopGenerator};
