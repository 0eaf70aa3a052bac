use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;

use crate::error::ConfigError;
use crate::generation::GenerationConfig;

/// Central configuration loaded from environment variables.
///
/// Nothing here is secret, but it is still read from env vars so a
/// deployment can re-target the bot without code changes. The .env file
/// is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Restricted term list, one term per line
    pub terms_path: PathBuf,
    /// Three-slot prompt template
    pub template_path: PathBuf,
    /// Base URL of the inference server hosting the fine-tuned model
    pub generator_url: String,
    /// Whole-request timeout for one generation call
    pub generator_timeout: Duration,
    /// Longest query accepted, in characters
    pub max_query_chars: usize,
    /// Sampling parameters handed to the backend
    pub generation: GenerationConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every setting has a default. A variable that is set but can't be
    /// parsed is an error rather than a silent fallback.
    pub fn load() -> Result<Self> {
        let defaults = GenerationConfig::default();
        let generation = GenerationConfig {
            max_new_tokens: parse_var("MEDCHAT_MAX_NEW_TOKENS", defaults.max_new_tokens)?,
            do_sample: parse_var("MEDCHAT_DO_SAMPLE", defaults.do_sample)?,
            temperature: parse_var("MEDCHAT_TEMPERATURE", defaults.temperature)?,
            top_k: parse_var("MEDCHAT_TOP_K", defaults.top_k)?,
            top_p: parse_var("MEDCHAT_TOP_P", defaults.top_p)?,
            use_cache: parse_var("MEDCHAT_USE_CACHE", defaults.use_cache)?,
        };

        Ok(Self {
            terms_path: env::var("MEDCHAT_TERMS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./config/restricted_terms.txt")),
            template_path: env::var("MEDCHAT_TEMPLATE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./config/prompt_template.txt")),
            generator_url: env::var("MEDCHAT_GENERATOR_URL").unwrap_or_else(|_| {
                crate::generation::tgi::DEFAULT_GENERATOR_URL.to_string()
            }),
            generator_timeout: Duration::from_secs(parse_var(
                "MEDCHAT_GENERATOR_TIMEOUT_SECS",
                120u64,
            )?),
            max_query_chars: parse_var(
                "MEDCHAT_MAX_QUERY_CHARS",
                crate::orchestrator::DEFAULT_MAX_QUERY_CHARS,
            )?,
            generation,
        })
    }

    /// Check that the generator URL looks usable.
    /// Call this before any operation that reaches the model.
    pub fn require_generator(&self) -> Result<()> {
        if !(self.generator_url.starts_with("http://") || self.generator_url.starts_with("https://"))
        {
            anyhow::bail!(
                "MEDCHAT_GENERATOR_URL must be an http(s) URL, got {:?}.\n\
                 See .env.example for the required variables.",
                self.generator_url
            );
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidSetting { var, value }),
        Err(_) => Ok(default),
    }
}
