//! FileSystem Actor
//!
//! Watches the source tree and config file, and sends debounced rebuild
//! plans to the BuildActor. Roots that do not exist yet are attached once
//! they appear.
//!
//! ```text
//! Watcher → Debouncer (timing) → Classifier (fs state) → RebuildPlan
//! ```

use std::path::PathBuf;

use notify::RecommendedWatcher;
use tokio::sync::mpsc;

use super::messages::BuildMsg;
use crate::config::cfg;

mod classifier;
mod debouncer;
mod router;
mod types;
mod watch_roots;


use classifier::EventClassifier;
use debouncer::Debouncer;
use router::{events_to_plan, log_events};
use watch_roots::WatchRoots;

pub struct FsActor {
    /// Sync channel fed by notify
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Must be kept alive for events to flow
    watcher: RecommendedWatcher,
    watch_roots: WatchRoots,
    build_tx: mpsc::Sender<BuildMsg>,
    debouncer: Debouncer,
}

impl FsActor {
    pub fn new(paths: Vec<PathBuf>, build_tx: mpsc::Sender<BuildMsg>) -> notify::Result<Self> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        let mut watch_roots = WatchRoots::new(paths);
        watch_roots.attach_existing(&mut watcher)?;

        Ok(Self {
            notify_rx,
            watcher,
            watch_roots,
            build_tx,
            debouncer: Debouncer::new(),
        })
    }

    pub async fn run(self) {
        let notify_rx = self.notify_rx;
        let build_tx = self.build_tx;
        let mut debouncer = self.debouncer;
        let mut watcher = self.watcher;
        let mut watch_roots = self.watch_roots;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        loop {
            tokio::select! {
                biased;
                Some(event) = async_rx.recv() => debouncer.add_event(&event),
                _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                    watch_roots.maintain(&mut watcher);
                    if process_changes(&mut debouncer, &build_tx).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

/// Returns `Err(())` once the BuildActor is gone.
async fn process_changes(
    debouncer: &mut Debouncer,
    build_tx: &mpsc::Sender<BuildMsg>,
) -> Result<(), ()> {
    if crate::core::is_shutdown() {
        return Err(());
    }

    let Some(raw_events) = debouncer.take_if_ready() else {
        return Ok(());
    };

    let Some(events) = EventClassifier::classify(raw_events) else {
        return Ok(());
    };

    log_events(&events);

    let plan = events_to_plan(events, &cfg());
    if plan.is_empty() {
        crate::debug!("watch"; "nothing to rebuild");
        return Ok(());
    }

    build_tx.send(BuildMsg::Rebuild(plan)).await.map_err(|_| ())
}
