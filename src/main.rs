use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tokio::io::AsyncReadExt;
use tracing::info;

use scamwatch::config::Config;
use scamwatch::output;
use scamwatch::pipeline::normalize::parse_batch;
use scamwatch::pipeline::{ModelRegistry, Outcome, Pipeline};
use scamwatch::taxonomy::Taxonomy;

/// Scamwatch: scam incident labelling, summaries, and weekly trends.
///
/// Reads a JSON array of incident reports, assigns each a two-level scam
/// category and a short summary, clusters them into topics, and reports
/// which topics grew week over week.
#[derive(Parser)]
#[command(name = "scamwatch", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a batch of incidents and print the JSON report
    Analyze {
        /// JSON array of incidents (read from stdin when omitted)
        input: Option<String>,

        /// Print the report on a single line
        #[arg(long)]
        compact: bool,

        /// Also show trending topics as a table on stderr
        #[arg(long)]
        table: bool,

        /// Incidents to enrich in parallel (default: SCAMWATCH_CONCURRENCY or 4)
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Download the ONNX zero-shot and embedding models (~160 MB)
    DownloadModel,

    /// Print the scam category tree
    Taxonomy,

    /// Show configured backends and model status
    Status,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout is reserved for the JSON report
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("scamwatch=info")),
        )
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => {
            // --help and --version
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            emit_error(&format!("Invalid arguments: {}", first_line(&e.to_string())));
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            emit_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Analyze {
            input,
            compact,
            table,
            concurrency,
        } => {
            let config = Config::load()?;

            let raw = match input {
                Some(text) => text,
                None => read_stdin().await?,
            };

            let batch = match parse_batch(&raw) {
                Ok(batch) => batch,
                Err(e) => {
                    emit_error(&format!("{e:#}"));
                    return Ok(ExitCode::FAILURE);
                }
            };

            let concurrency = concurrency.unwrap_or(config.concurrency);
            let pipeline = Pipeline::new(
                ModelRegistry::from_config(config),
                Taxonomy::builtin(),
                concurrency,
            );

            if batch.is_empty() {
                let outcome = pipeline.process(batch).await;
                output::write_json(&outcome, compact)?;
                return Ok(ExitCode::FAILURE);
            }

            // A model that fails to load is a startup failure (exit 1)
            pipeline.registry().get().await?;

            info!(incidents = batch.len(), concurrency, "Analyzing incidents");
            let outcome = pipeline.process(batch).await;

            if table {
                if let Some(report) = outcome.report() {
                    output::terminal::display_trends(
                        &report.trending_topics,
                        report.total_patterns,
                    );
                }
            }

            output::write_json(&outcome, compact)?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::DownloadModel => {
            let config = Config::load()?;
            let model_dir = &config.model_dir;

            println!("Downloading ONNX models...");
            println!("  Destination: {}", model_dir.display());

            scamwatch::download::download_models(model_dir).await?;

            println!("\n{}", "Models downloaded successfully.".bold());
            println!("You can now run `scamwatch analyze < incidents.json`.");
            Ok(ExitCode::SUCCESS)
        }

        Commands::Taxonomy => {
            output::terminal::display_taxonomy(&Taxonomy::builtin());
            Ok(ExitCode::SUCCESS)
        }

        Commands::Status => {
            let config = Config::load()?;
            scamwatch::status::show(&config);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buf)
        .await
        .context("Failed to read stdin")?;
    Ok(buf)
}

/// Print `{"error": message}` on stdout. Output failures are ignored since
/// there is nowhere left to report them.
fn emit_error(message: &str) {
    let _ = output::write_json(&Outcome::error(message), false);
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or(text).trim()
}
