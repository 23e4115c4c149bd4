mod cli;
mod logging;
mod progress;
mod sources;

use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use clipscribe_core::RunState;
use clipscribe_engine::{BatchEngine, CompletionTracker, CredentialPool, GeminiGenerator};
use engine_logging::{engine_error, engine_info};

use cli::Cli;
use logging::LogDestination;
use progress::LogProgress;
use sources::{resolve_sources, StdFilesystem, SOURCES_ENV};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let destination = if cli.no_log_file {
        LogDestination::Terminal
    } else {
        LogDestination::Both(cli.log_dir.clone())
    };
    if let Some(path) = logging::initialize(destination, engine_logging::parse_level(&cli.log_level))
    {
        engine_info!("Log file created: {}", path.display());
    }

    run(cli).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let pool = CredentialPool::new(cli.credentials())
        .context("pass at least one key with --api-key or GEMINI_API_KEYS")?;

    let env_sources = std::env::var_os(SOURCES_ENV);
    let paths = resolve_sources(&cli.sources, env_sources.as_deref(), &StdFilesystem);
    if paths.is_empty() {
        bail!("no input sources found");
    }

    let generator =
        GeminiGenerator::new(cli.gemini_settings()?).context("failed to build the API client")?;
    let tracker = CompletionTracker::load(&cli.tracker);

    let mut engine = BatchEngine::new(cli.batch_settings(), pool, tracker, Arc::new(generator))
        .with_progress_sink(Arc::new(LogProgress));

    // A panic inside the run still drops the engine, which flushes the tracker.
    let handle = tokio::spawn(async move { engine.run(&paths).await });
    let summary = match handle.await {
        Ok(summary) => summary,
        Err(err) => {
            engine_error!("Run {}: {}", RunState::Crashed, err);
            return Err(anyhow!("batch run crashed: {err}"));
        }
    };

    engine_info!(
        "Done: {} succeeded, {} failed, {} skipped",
        summary.succeeded,
        summary.failed,
        summary.skipped
    );
    Ok(())
}
