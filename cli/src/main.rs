//! factcheck — command-line front end.
//!
//! Verifies a piece of text against web-search context using a hosted
//! language model, and prints the five-key result object as JSON.
//!
//! Usage:
//!   factcheck verify --text "The Eiffel Tower is in Berlin."
//!   factcheck verify --file article.txt
//!   echo "claim" | factcheck verify
//!   factcheck verify-image photo.png
//!
//! Configuration comes from an optional `--config` TOML file overlaid with
//! `HUGGINGFACE_API_KEY`, `USE_HUGGINGFACE`, and `SERPER_API_KEY`.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use factcheck_contracts::{
    config::{FactcheckConfig, ENV_INFERENCE_ENABLED},
    error::{FactcheckError, FactcheckResult},
    result::VerificationResult,
};
use factcheck_core::{image, FactChecker};
use factcheck_inference::HuggingFaceClient;
use factcheck_response::JsonReplyParser;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Fact-check text with a hosted language model and web search.
#[derive(Parser)]
#[command(
    name = "factcheck",
    about = "Fact-check text with a hosted language model",
    long_about = "Searches the web for context, asks a hosted language model to fact-check\n\
                  the input against it, and prints a JSON result with the keys\n\
                  verified, percentage, analysis, errors, and summary."
)]
struct Cli {
    /// TOML configuration file. Environment variables override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify text given inline, read from a file, or read from stdin.
    Verify {
        /// Text to verify.
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        /// File whose contents should be verified.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Verify an image (not supported by the hosted backend).
    VerifyImage {
        /// Image file to verify.
        path: PathBuf,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Verify { text, file } => run_verify(cli.config.as_deref(), text, file),
        Command::VerifyImage { path } => run_verify_image(&path),
    };

    match result.and_then(|result| render(&result)) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("factcheck error: {e}");
            std::process::exit(1);
        }
    }
}

// ── Command dispatch ──────────────────────────────────────────────────────────

fn run_verify(
    config_path: Option<&Path>,
    text: Option<String>,
    file: Option<PathBuf>,
) -> FactcheckResult<VerificationResult> {
    let config = FactcheckConfig::load(config_path)?;
    if !config.inference.enabled {
        return Err(FactcheckError::Config {
            reason: format!(
                "hosted inference is disabled; set {ENV_INFERENCE_ENABLED}=true or \
                 inference.enabled = true"
            ),
        });
    }

    let text = read_input(text, file.as_deref())?;
    let checker = build_checker(&config)?;

    info!(model = %config.inference.model, "running verification");
    Ok(checker.verify(&text))
}

fn run_verify_image(path: &Path) -> FactcheckResult<VerificationResult> {
    let bytes = std::fs::read(path).map_err(|e| FactcheckError::Io {
        reason: format!("failed to read '{}': {e}", path.display()),
    })?;
    Ok(image::verify_image(&bytes))
}

/// Wire the production collaborators together.
fn build_checker(config: &FactcheckConfig) -> FactcheckResult<FactChecker> {
    let search = factcheck_search::provider_from_config(&config.search)?;
    let generator = HuggingFaceClient::new(config.inference.clone())?;
    let parser = JsonReplyParser::new()?;
    Ok(FactChecker::new(search, Box::new(generator), Box::new(parser)))
}

/// Inline text wins, then the file, then stdin.
fn read_input(text: Option<String>, file: Option<&Path>) -> FactcheckResult<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    match file {
        Some(path) => std::fs::read_to_string(path).map_err(|e| FactcheckError::Io {
            reason: format!("failed to read '{}': {e}", path.display()),
        }),
        None => std::io::read_to_string(std::io::stdin()).map_err(|e| FactcheckError::Io {
            reason: format!("failed to read stdin: {e}"),
        }),
    }
}

fn render(result: &VerificationResult) -> FactcheckResult<String> {
    serde_json::to_string_pretty(result).map_err(|e| FactcheckError::Io {
        reason: format!("failed to render result: {e}"),
    })
}
