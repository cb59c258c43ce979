//! rqm - rate-limited MusicBrainz edit submitter
//!
//! CLI entry point for submitting batches of edits through the request queue.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use tracing::info;

use requestmanager::cli::{Cli, Command, OutputFormat, get_log_path};
use requestmanager::config::Config;
use requestmanager::editing::{EditBatch, EditRequest, Editor, HttpEditClient, query, referential};
use requestmanager::scheduler::RequestManager;

fn setup_logging(verbose: bool) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Setup tracing subscriber - write to log file, not stdout/stderr
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate()?;

    info!(
        "requestmanager loaded config: base_url={}, rate_interval_ms={}, max_retries={:?}",
        config.server.base_url, config.scheduler.rate_interval_ms, config.retry.max_retries
    );

    match cli.command {
        Some(Command::Submit { file, format }) => cmd_submit(&config, &file, format).await,
        Some(Command::Lookup { entity, mbid, inc }) => cmd_lookup(&config, &entity, &mbid, &inc).await,
        Some(Command::Escape { text }) => {
            println!("{}", query::lucene_escape(&text));
            Ok(())
        }
        Some(Command::WorkTypes) => {
            for (id, name) in referential::WORK_TYPES {
                println!("{:>3}  {}", id, name);
            }
            Ok(())
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

fn build_editor(config: &Config) -> Result<Editor> {
    let manager = RequestManager::new(config.scheduler.clone()).context("Failed to create request manager")?;
    let client = HttpEditClient::from_config(&config.server).context("Failed to create HTTP client")?;
    Ok(Editor::new(manager, Arc::new(client), config.retry))
}

/// Submit every edit of a batch file and report each outcome
async fn cmd_submit(config: &Config, file: &Path, format: OutputFormat) -> Result<()> {
    let content = fs::read_to_string(file).context(format!("Failed to read {}", file.display()))?;
    let batch: EditBatch = serde_yaml::from_str(&content).context(format!("Failed to parse {}", file.display()))?;

    // Reject the whole batch up front rather than half-submitting it
    let requests = batch
        .edits
        .iter()
        .enumerate()
        .map(|(i, spec)| spec.to_request().context(format!("Invalid edit #{}", i + 1)))
        .collect::<Result<Vec<EditRequest>>>()?;

    info!(count = requests.len(), file = %file.display(), "Submitting batch");
    let editor = build_editor(config)?;
    let labels: Vec<String> = requests.iter().map(|r| r.to_string()).collect();
    let completions = editor.submit_all(requests);

    let mut failed = 0;
    for (index, (label, completion)) in labels.iter().zip(completions).enumerate() {
        let result = completion.await;
        if result.is_err() {
            failed += 1;
        }

        match format {
            OutputFormat::Text => match &result {
                Ok(response) => println!("{} {} ({})", "✓".green(), label, response.status),
                Err(e) => println!("{} {}: {}", "✗".red(), label, e),
            },
            OutputFormat::Json => {
                let line = serde_json::json!({
                    "index": index + 1,
                    "request": label,
                    "ok": result.is_ok(),
                    "status": result.as_ref().ok().map(|r| r.status),
                    "attempts": result.as_ref().err().and_then(|e| e.attempts()),
                    "error": result.as_ref().err().map(|e| e.to_string()),
                });
                println!("{}", line);
            }
        }
    }

    let stats = editor.manager().stats();
    info!(
        edits = labels.len(),
        failed,
        dispatched = stats.total_dispatched,
        retries = stats.total_unshifted,
        "Batch finished"
    );

    if failed > 0 {
        return Err(eyre!("{} of {} edits failed", failed, labels.len()));
    }
    Ok(())
}

/// Fetch one entity and print the raw body
async fn cmd_lookup(config: &Config, entity: &str, mbid: &str, inc: &[String]) -> Result<()> {
    let request = EditRequest::lookup(entity, mbid, inc)?;
    let editor = build_editor(config)?;

    let response = editor.submit(request).await.context("Lookup failed")?;
    println!("{}", response.body);
    Ok(())
}
