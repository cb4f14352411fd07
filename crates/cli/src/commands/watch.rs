//! Hot-reload mode: re-run a session every time the config file changes.
//!
//! The file is watched on a blocking thread and each validated reload is
//! broadcast over a `watch` channel. Every run snapshots the config it
//! receives, so an edit landing mid-run only affects the next run.

use anyhow::Result;
use clap::Args;

use dont_pass_core::config_loader::DEFAULT_CONFIG_PATH;
use dont_pass_core::{AppConfig, ConfigLoader, ConfigWatcher};
use dont_pass_simulation::SessionRunner;

use super::simulate::{format_text_report, OutputFormat, SimulationReport};

/// Arguments for the watch command.
#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    /// Config file to watch
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Output format: text, json (default: text)
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Snapshots `app` and runs one session on a blocking thread.
async fn run_snapshot(app: AppConfig, format: OutputFormat) -> Result<()> {
    let config = app.strategy_config()?;
    let seed = app.simulation.seed;
    let log_limit = app.report.log_limit;

    let session_config = config.clone();
    let result =
        tokio::task::spawn_blocking(move || SessionRunner::run_seeded(session_config, seed))
            .await??;

    let report = SimulationReport::new(config, seed, &result, log_limit);
    match format {
        OutputFormat::Text => print!("{}", format_text_report(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string(&report)?),
    }
    Ok(())
}

/// Runs the watch command until Ctrl+C.
pub async fn run_watch(args: WatchArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;
    let initial = ConfigLoader::load_from(&args.config)?;

    let (watcher, mut rx) = ConfigWatcher::new(initial.clone());
    let path = args.config.clone();
    let watch_handle = tokio::spawn(async move { watcher.watch(&path).await });

    tracing::info!("Watching {} for changes (Ctrl+C to stop)", args.config);
    if let Err(e) = run_snapshot(initial, format).await {
        tracing::error!("Initial run failed: {}", e);
    }

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    tracing::warn!("Config watcher closed");
                    break;
                }
                let app = rx.borrow_and_update().clone();
                if let Err(e) = run_snapshot(app, format).await {
                    tracing::error!("Run failed: {}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, stopping watch");
                break;
            }
        }
    }

    drop(rx);
    watch_handle.await??;

    tracing::info!("Watch stopped");
    Ok(())
}
