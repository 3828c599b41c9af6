//! Actor Coordinator - wires up and runs the watch-mode actors.
//!
//! ```text
//! FsActor --> BuildActor --> WsActor
//! ```
//!
//! Thin orchestration only: channels, the WebSocket listener, and the
//! shutdown sequence. Transform logic lives in `asset`, `image` and `prune`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::build::BuildActor;
use super::fs::FsActor;
use super::messages::{BuildMsg, WsMsg};
use super::ws::WsActor;
use crate::config::cfg;
use crate::reload::ReloadMessage;

const CHANNEL_BUFFER: usize = 32;

#[derive(Default)]
pub struct Coordinator {
    shutdown_rx: Option<Receiver<()>>,
    /// Initial build failure, shown to the first clients.
    initial_error: Option<ReloadMessage>,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    pub fn with_initial_error(mut self, error: Option<ReloadMessage>) -> Self {
        self.initial_error = error;
        self
    }

    pub async fn run(mut self) -> Result<()> {
        let (build_tx, build_rx) = mpsc::channel::<BuildMsg>(CHANNEL_BUFFER);
        let (ws_tx, ws_rx) = mpsc::channel::<WsMsg>(CHANNEL_BUFFER);

        let config = cfg();
        match crate::reload::server::start_ws_server(
            config.serve.interface,
            config.serve.ws_port,
            ws_tx.clone(),
        ) {
            Ok(port) => crate::cli::serve::set_actual_ws_port(port),
            Err(e) => crate::log!("ws"; "websocket server failed: {}", e),
        }

        let fs_actor = FsActor::new(watch_paths(), build_tx.clone())
            .map_err(|e| anyhow::anyhow!("watcher failed: {}", e))?;
        crate::log!("watch"; "watching {}", config.root_relative(&config.build.src).display());
        let failed = self.initial_error.is_some();
        let build_actor = BuildActor::new(build_rx, ws_tx.clone()).with_had_error(failed);
        let ws_actor = WsActor::new(ws_rx).with_pending_error(self.initial_error.take());

        crate::debug!("actor"; "start");
        let shutdown_rx = self.shutdown_rx.take();
        run_actors(fs_actor, build_actor, ws_actor, build_tx, ws_tx, shutdown_rx).await;
        crate::debug!("actor"; "stopped");
        Ok(())
    }
}

/// `src` recursively, plus the config file itself.
fn watch_paths() -> Vec<PathBuf> {
    let config = cfg();
    let mut paths = vec![config.build.src.clone()];
    if config.config_path.exists() {
        paths.push(config.config_path.clone());
    }
    paths
}

async fn run_actors(
    fs: FsActor,
    build: BuildActor,
    ws: WsActor,
    build_tx: mpsc::Sender<BuildMsg>,
    ws_tx: mpsc::Sender<WsMsg>,
    shutdown_rx: Option<Receiver<()>>,
) {
    let build_handle = tokio::spawn(build.run());
    let ws_handle = tokio::spawn(ws.run());
    let fs_handle = tokio::spawn(fs.run());

    match shutdown_rx {
        // crossbeam receiver: poll it
        Some(rx) => loop {
            if rx.try_recv().is_ok() || crate::core::is_shutdown() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        },
        None => {
            let _ = build_handle.await;
            return;
        }
    }

    fs_handle.abort();
    let _ = build_tx.send(BuildMsg::Shutdown).await;
    let _ = ws_tx.send(WsMsg::Shutdown).await;

    let timeout = Duration::from_millis(500);
    let _ = tokio::time::timeout(timeout, build_handle).await;
    let _ = tokio::time::timeout(timeout, ws_handle).await;
}
