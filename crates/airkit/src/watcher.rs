//! Watching the dataset and config for rebuilds.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Quiet period that ends a burst of writes.
const DEBOUNCE: Duration = Duration::from_millis(100);

/// What a burst of file changes touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEvent {
    /// Only table snapshots changed
    DataChanged,

    /// The configuration file changed, possibly along with data
    ConfigChanged,
}

/// Watches the data directory and the config file.
///
/// Bursts of writes (`airkit fetch` saving every table, editors saving
/// through temp files) are reported as one event, sent once the burst has
/// been quiet for [`DEBOUNCE`].
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Start watching `data_dir` and `config_path`.
    ///
    /// Returns the watcher and a channel to receive events. Dropping the
    /// watcher closes the channel.
    pub fn new(
        data_dir: &Path,
        config_path: &Path,
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(16);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        if data_dir.exists() {
            watcher
                .watch(data_dir, RecursiveMode::Recursive)
                .map_err(std::io::Error::other)?;
        }
        if config_path.exists() {
            watcher
                .watch(config_path, RecursiveMode::NonRecursive)
                .map_err(std::io::Error::other)?;
        }

        let config_name = config_path.file_name().map(OsString::from);

        std::thread::spawn(move || {
            while let Ok(first) = sync_rx.recv() {
                let mut burst = Burst::default();
                burst.add(&first, config_name.as_deref());

                let closed = loop {
                    match sync_rx.recv_timeout(DEBOUNCE) {
                        Ok(event) => burst.add(&event, config_name.as_deref()),
                        Err(RecvTimeoutError::Timeout) => break false,
                        Err(RecvTimeoutError::Disconnected) => break true,
                    }
                };

                if let Some(event) = burst.event() {
                    if async_tx.blocking_send(event).is_err() {
                        return;
                    }
                }
                if closed {
                    return;
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Changes accumulated until the watcher goes quiet.
#[derive(Debug, Default)]
struct Burst {
    data: bool,
    config: bool,
}

impl Burst {
    fn add(&mut self, event: &notify::Event, config_name: Option<&OsStr>) {
        if !is_change(&event.kind) {
            return;
        }
        for path in &event.paths {
            if config_name.is_some() && path.file_name() == config_name {
                self.config = true;
            } else {
                self.data = true;
            }
        }
    }

    fn event(&self) -> Option<WatchEvent> {
        if self.config {
            Some(WatchEvent::ConfigChanged)
        } else if self.data {
            Some(WatchEvent::DataChanged)
        } else {
            None
        }
    }
}

/// Whether the event kind can change file contents.
fn is_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}
