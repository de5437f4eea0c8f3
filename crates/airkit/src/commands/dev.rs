//! Watch mode: rebuild page props whenever the data or config changes.

use std::path::{Path, PathBuf};

use airkit_static::StaticBuilder;
use anyhow::{Context, Result};

use crate::config::{load_config, ConfigFile};
use crate::watcher::{FileWatcher, WatchEvent};

/// Run the dev command.
pub async fn run(config_path: &Path) -> Result<()> {
    let mut file_config = load_config(config_path)?;

    rebuild(&file_config).await;

    let data_dir = PathBuf::from(&file_config.data.dir);
    let (_watcher, mut rx) =
        FileWatcher::new(&data_dir, config_path).context("Failed to start file watcher")?;

    tracing::info!(
        "Watching {} and {} for changes (Ctrl+C to stop)",
        data_dir.display(),
        config_path.display()
    );

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else {
                    break;
                };

                tracing::debug!("{:?}", event);

                if event == WatchEvent::ConfigChanged {
                    match load_config(config_path) {
                        Ok(config) => file_config = config,
                        Err(e) => {
                            tracing::warn!("Keeping previous configuration: {:#}", e);
                            continue;
                        }
                    }
                }

                rebuild(&file_config).await;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping");
                break;
            }
        }
    }

    Ok(())
}

/// Build once, logging failures instead of returning them.
async fn rebuild(file_config: &ConfigFile) {
    match StaticBuilder::new(file_config.build_config()).build().await {
        Ok(result) => tracing::info!(
            "Rebuilt {} pages in {}ms",
            result.pages,
            result.duration_ms
        ),
        Err(e) => tracing::warn!("Build failed: {}", e),
    }
}
