//! Configuration hot reload.
//!
//! A background task polls the configuration file's modification time and
//! publishes every successfully parsed version on a [`watch`] channel.
//! Widgets hold a [`watch::Receiver`] and re-bind between refresh cycles.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::Configuration;

/// How often the watcher checks the file's modification time.
pub const RELOAD_POLL: Duration = Duration::from_secs(2);

pub type ConfigReceiver = watch::Receiver<Arc<Configuration>>;

/// Load the initial configuration, treating a missing or broken file as an
/// empty configuration so every widget starts in its default state.
pub fn initial(path: &std::path::Path) -> Configuration {
    match Configuration::load(path) {
        Ok(cfg) => {
            info!(path = %path.display(), "configuration loaded");
            cfg
        }
        Err(e) => {
            warn!(error = %e, "starting with an empty configuration");
            Configuration::default()
        }
    }
}

/// Spawn the reload watcher.
///
/// The task ends once every receiver has been dropped.
pub fn spawn_watcher(
    path: PathBuf,
    tx: watch::Sender<Arc<Configuration>>,
    poll: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last_mtime = modified(&path).await;
        let mut ticker = tokio::time::interval(poll);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if tx.is_closed() {
                return;
            }

            let mtime = modified(&path).await;
            let changed = match (last_mtime, mtime) {
                (Some(prev), Some(now)) => now > prev,
                (None, Some(_)) => true,
                _ => false,
            };
            if !changed {
                continue;
            }
            last_mtime = mtime;

            match tokio::fs::read_to_string(&path).await {
                Ok(content) => match Configuration::from_json_str(&content) {
                    Ok(cfg) => {
                        info!(path = %path.display(), "configuration reloaded");
                        tx.send_replace(Arc::new(cfg));
                    }
                    Err(e) => warn!(error = %e, "keeping previous configuration"),
                },
                Err(e) => warn!(error = %e, "configuration unreadable"),
            }
        }
    })
}

async fn modified(path: &std::path::Path) -> Option<SystemTime> {
    tokio::fs::metadata(path)
        .await
        .and_then(|m| m.modified())
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn initial_falls_back_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = initial(&dir.path().join("absent.json"));
        assert_eq!(cfg, Configuration::default());
    }

    #[tokio::test]
    async fn watcher_publishes_changed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mirror.json");

        let (tx, mut rx) = watch::channel(Arc::new(Configuration::default()));
        let handle = spawn_watcher(path.clone(), tx, Duration::from_millis(20));

        // The file appears after the watcher has started.
        tokio::time::sleep(Duration::from_millis(50)).await;
        fs::write(&path, r#"[{ "module": "RadioPlayer" }]"#).unwrap();

        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .expect("reload within timeout")
            .unwrap();
        assert!(rx.borrow().lookup("RadioPlayer").is_some());

        drop(rx);
        handle.abort();
    }

    #[tokio::test]
    async fn watcher_keeps_previous_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mirror.json");

        let (tx, rx) = watch::channel(Arc::new(Configuration::default()));
        let handle = spawn_watcher(path.clone(), tx, Duration::from_millis(20));

        tokio::time::sleep(Duration::from_millis(50)).await;
        fs::write(&path, "not json").unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(!rx.has_changed().unwrap());
        handle.abort();
    }
}
