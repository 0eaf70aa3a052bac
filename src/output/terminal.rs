// Colored terminal output for gate decisions, answers and settings.
//
// main.rs delegates all terminal-specific formatting here.

use colored::Colorize;

use crate::gate::GateDecision;
use crate::generation::GenerationConfig;
use crate::orchestrator::Reply;

/// Show a gate decision, including the matched terms.
/// Operator-facing only; end users never see which terms matched.
pub fn display_decision(decision: &GateDecision) {
    match decision {
        GateDecision::Allowed => println!("{}", "ALLOWED".green().bold()),
        GateDecision::Blocked(matched) => {
            let terms: Vec<&str> = matched.iter().map(String::as_str).collect();
            println!(
                "{} (matched: {})",
                "BLOCKED".red().bold(),
                terms.join(", ")
            );
        }
    }
}

/// Show a reply from the orchestrator.
pub fn display_reply(reply: &Reply) {
    match reply {
        Reply::Refused => println!("{}", crate::orchestrator::REFUSAL_MESSAGE.yellow()),
        Reply::Answered(text) => println!("{text}"),
    }
}

/// Show the sampling parameters in a compact table.
pub fn display_generation_config(config: &GenerationConfig) {
    println!("{}", "Generation settings:".bold());
    println!("  {:<16} {}", "max_new_tokens".dimmed(), config.max_new_tokens);
    println!("  {:<16} {}", "do_sample".dimmed(), config.do_sample);
    println!("  {:<16} {}", "temperature".dimmed(), config.temperature);
    println!("  {:<16} {}", "top_k".dimmed(), config.top_k);
    println!("  {:<16} {}", "top_p".dimmed(), config.top_p);
    println!("  {:<16} {}", "use_cache".dimmed(), config.use_cache);
}
