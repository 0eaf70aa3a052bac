// System status display: term list, template, backend and sampling settings.

use anyhow::Result;
use colored::Colorize;

use crate::config::Config;
use crate::gate::RestrictedTermSet;
use crate::output::{terminal, truncate_chars};
use crate::prompt::PromptTemplate;

/// Display configuration status to the terminal.
///
/// Load failures are reported rather than returned so the operator sees
/// every problem in one run.
pub fn show(config: &Config) -> Result<()> {
    match RestrictedTermSet::load(&config.terms_path) {
        Ok(terms) => {
            println!(
                "Restricted terms: {} loaded from {}",
                terms.len(),
                config.terms_path.display()
            );
            println!(
                "  {}",
                truncate_chars(&terms.terms().join(", "), 100).dimmed()
            );
        }
        Err(e) => println!("Restricted terms: {} {}", "error:".red(), e),
    }

    match PromptTemplate::load(&config.template_path) {
        Ok(_) => println!("Prompt template: {}", config.template_path.display()),
        Err(e) => println!("Prompt template: {} {}", "error:".red(), e),
    }

    println!(
        "Generation backend: {} (timeout {}s)",
        config.generator_url,
        config.generator_timeout.as_secs()
    );
    if let Err(e) = config.require_generator() {
        println!("  {} {}", "error:".red(), e);
    }
    println!("Max query length: {} characters", config.max_query_chars);
    println!();

    terminal::display_generation_config(&config.generation);
    Ok(())
}
