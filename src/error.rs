// Error taxonomy for the gate/respond pipeline.
//
// Two enums, split by lifecycle: ConfigError only happens at startup and is
// fatal; RespondError happens per request and goes back to the caller.
// Neither variant ever carries the query text.

use std::path::PathBuf;

use thiserror::Error;

/// Startup failure loading the term set or prompt template.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("restricted term list {0} contains no terms")]
    EmptyTermSet(PathBuf),

    #[error("restricted term {term:?} could not be compiled: {reason}")]
    InvalidTerm { term: String, reason: String },

    #[error("prompt template {path} is missing the {slot} slot")]
    MissingSlot { path: PathBuf, slot: &'static str },

    #[error("invalid value for {var}: {value:?}")]
    InvalidSetting { var: &'static str, value: String },
}

/// Per-request failure from the orchestrator.
///
/// A policy refusal is NOT an error: blocked queries produce the refusal
/// string as a normal `Ok` value.
#[derive(Debug, Error)]
pub enum RespondError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("generation service failed: {0:#}")]
    Generation(#[source] anyhow::Error),
}

impl RespondError {
    /// True when the failure came from the backend rather than the caller.
    pub fn is_backend_failure(&self) -> bool {
        matches!(self, RespondError::Generation(_))
    }
}
