use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use medchat::config::Config;
use medchat::error::RespondError;
use medchat::gate::{ContentGate, RestrictedTermSet};
use medchat::generation::tgi::TgiGenerator;
use medchat::orchestrator::Responder;
use medchat::output::terminal;
use medchat::prompt::PromptTemplate;

/// medchat: a medical chatbot that only answers medical questions.
///
/// Questions mentioning off-topic words are refused before they reach the
/// fine-tuned model; everything else is answered by it.
#[derive(Parser)]
#[command(name = "medchat", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question and print the answer
    Ask {
        /// The question to ask
        question: String,
    },

    /// Interactive chat on stdin (type `exit` to quit)
    Chat,

    /// Run a question through the content gate only, showing matched terms
    Check {
        /// The question to check
        question: String,
    },

    /// Format the medical reasoning dataset for fine-tuning
    PrepareDataset {
        /// JSONL file with Question / Complex_CoT / Response rows
        #[arg(long)]
        input: PathBuf,

        /// Where to write the formatted {"text": ...} JSONL
        #[arg(long)]
        output: PathBuf,

        /// End-of-sequence token appended to every example
        #[arg(long, default_value = medchat::dataset::DEFAULT_EOS_TOKEN)]
        eos: String,
    },

    /// Show configuration status (term list, template, backend)
    Status,

    /// Start the web chat form
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: 7860)
        #[arg(long, default_value = "7860")]
        port: u16,

        /// Address to bind (default: 127.0.0.1)
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("medchat=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ask { question } => {
            let config = Config::load()?;
            let responder = build_responder(&config)?;

            let spinner = spinner("Generating...");
            let result = tokio::select! {
                result = responder.respond_detailed(&question) => result,
                _ = tokio::signal::ctrl_c() => {
                    spinner.finish_and_clear();
                    println!("{}", "Cancelled.".dimmed());
                    return Ok(());
                }
            };
            spinner.finish_and_clear();

            terminal::display_reply(&result.map_err(explain)?);
        }

        Commands::Chat => {
            let config = Config::load()?;
            let responder = build_responder(&config)?;

            println!("{}", "Medical Chatbot".bold());
            println!(
                "{}",
                "Ask a medical question. Type `exit` or press Ctrl-D to quit.".dimmed()
            );

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                print!("{} ", ">".cyan().bold());
                std::io::stdout().flush()?;

                let Some(line) = lines.next_line().await? else {
                    println!();
                    break;
                };
                let question = line.trim();
                if question.is_empty() {
                    continue;
                }
                if matches!(question, "exit" | "quit") {
                    break;
                }

                let spinner = spinner("Generating...");
                let result = responder.respond_detailed(question).await;
                spinner.finish_and_clear();

                // One bad turn shouldn't end the session
                match result {
                    Ok(reply) => terminal::display_reply(&reply),
                    Err(e) => println!("{} {:#}", "Error:".red(), explain(e)),
                }
                println!();
            }
        }

        Commands::Check { question } => {
            let config = Config::load()?;
            let gate = load_gate(&config)?;
            terminal::display_decision(&gate.evaluate(&question));
        }

        Commands::PrepareDataset { input, output, eos } => {
            let config = Config::load()?;
            let template = PromptTemplate::load(&config.template_path)?;

            let reader = std::io::BufReader::new(
                std::fs::File::open(&input)
                    .with_context(|| format!("Failed to open {}", input.display()))?,
            );
            let writer = std::io::BufWriter::new(
                std::fs::File::create(&output)
                    .with_context(|| format!("Failed to create {}", output.display()))?,
            );

            println!("Formatting {}...", input.display());
            let stats = medchat::dataset::format_jsonl(&template, reader, writer, &eos)?;

            println!("\n{}", "Dataset ready.".bold());
            println!("  Examples written: {}", stats.written);
            if stats.skipped > 0 {
                println!("  Rows skipped:     {}", stats.skipped.to_string().yellow());
            }
            println!("  Output: {}", output.display());
        }

        Commands::Status => {
            let config = Config::load()?;
            medchat::status::show(&config)?;
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            let responder = build_responder(&config)?;
            medchat::web::run_server(Arc::new(responder), port, &bind).await?;
        }
    }

    Ok(())
}

/// Compile the restricted term list. Fails (and the process exits) if the
/// list is missing or empty, so we never serve without a filter.
fn load_gate(config: &Config) -> Result<ContentGate> {
    let terms = RestrictedTermSet::load(&config.terms_path)?;
    Ok(ContentGate::new(&terms)?)
}

/// Wire up the gate, template and generation backend from configuration.
fn build_responder(config: &Config) -> Result<Responder> {
    config.require_generator()?;

    let gate = Arc::new(load_gate(config)?);
    let template = Arc::new(PromptTemplate::load(&config.template_path)?);
    let generator = Arc::new(TgiGenerator::new(
        &config.generator_url,
        config.generator_timeout,
    )?);

    info!(
        terms = gate.len(),
        backend = %config.generator_url,
        "Responder ready"
    );

    Ok(
        Responder::new(gate, template, generator, config.generation.clone())
            .with_max_query_chars(config.max_query_chars),
    )
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Add a hint for the operator to backend failures.
fn explain(e: RespondError) -> anyhow::Error {
    if e.is_backend_failure() {
        anyhow::Error::new(e).context(
            "Could not get an answer from the model. Is the inference server at \
             MEDCHAT_GENERATOR_URL running?",
        )
    } else {
        anyhow::Error::new(e)
    }
}
