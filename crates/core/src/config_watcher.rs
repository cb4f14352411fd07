use crate::config::AppConfig;
use crate::config_loader::ConfigLoader;
use anyhow::Result;
use notify::{Event, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;
use tokio::sync::watch;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Broadcasts validated configuration reloads to simulation runners.
///
/// Receivers only ever get whole `AppConfig` values; a runner snapshots one
/// into a `StrategyConfig` at start, so a reload never reaches a run that is
/// already in flight.
pub struct ConfigWatcher {
    tx: watch::Sender<AppConfig>,
}

impl ConfigWatcher {
    /// Creates a new configuration watcher with an initial configuration.
    ///
    /// Returns a tuple of the watcher and a receiver for configuration updates.
    #[must_use]
    pub fn new(initial_config: AppConfig) -> (Self, watch::Receiver<AppConfig>) {
        let (tx, rx) = watch::channel(initial_config);
        (Self { tx }, rx)
    }

    /// Reloads `config_path` and broadcasts it if it validates.
    ///
    /// Returns `true` when a new configuration was sent.
    pub fn reload(&self, config_path: &Path) -> bool {
        match ConfigLoader::load_from(config_path) {
            Ok(new_config) => match new_config.strategy_config() {
                Ok(strategy) => {
                    tracing::info!("Config reloaded: {}", strategy.describe());
                    self.tx.send_replace(new_config);
                    true
                }
                Err(e) => {
                    tracing::warn!("Ignoring invalid config: {}", e);
                    false
                }
            },
            Err(e) => {
                tracing::error!("Failed to reload config: {}", e);
                false
            }
        }
    }

    /// Watches the configuration file for changes and broadcasts updates.
    ///
    /// # Errors
    ///
    /// Returns an error if file watching cannot be initiated or if the watcher task fails.
    pub async fn watch(self, config_path: &str) -> Result<()> {
        let config_path = PathBuf::from(config_path);

        tokio::task::spawn_blocking(move || {
            let (notify_tx, notify_rx) = std::sync::mpsc::channel();

            let mut watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
                if let Ok(event) = res {
                    let _ = notify_tx.send(event);
                }
            })?;

            watcher.watch(&config_path, RecursiveMode::NonRecursive)?;

            // Poll so the thread exits once every receiver is gone.
            while !self.tx.is_closed() {
                match notify_rx.recv_timeout(POLL_INTERVAL) {
                    Ok(event) if event.kind.is_modify() => {
                        tracing::info!("Config file changed, reloading...");
                        self.reload(&config_path);
                    }
                    Ok(_) | Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            tracing::debug!("Config watcher stopped");

            Ok::<_, anyhow::Error>(())
        })
        .await??;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_broadcasts_valid_config() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("strategy.toml", "[simulation]\niterations = 33\n")?;

            let (watcher, rx) = ConfigWatcher::new(AppConfig::default());
            assert!(watcher.reload(Path::new("strategy.toml")));
            assert_eq!(rx.borrow().simulation.iterations, 33);
            Ok(())
        });
    }

    #[test]
    fn reload_keeps_previous_config_when_invalid() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("strategy.toml", "[simulation]\niterations = 0\n")?;

            let (watcher, rx) = ConfigWatcher::new(AppConfig::default());
            assert!(!watcher.reload(Path::new("strategy.toml")));
            assert_eq!(rx.borrow().simulation.iterations, 1000);
            Ok(())
        });
    }

    #[tokio::test]
    async fn watch_fails_for_missing_file() {
        let (watcher, _rx) = ConfigWatcher::new(AppConfig::default());
        let result = watcher.watch("does/not/exist/Config.toml").await;
        assert!(result.is_err());
    }
}
