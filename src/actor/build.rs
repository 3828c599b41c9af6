//! Build Actor - runs the transforms for each rebuild plan
//!
//! Transforms are CPU-bound and run on the blocking pool; the unlink hooks
//! are async and run on the actor task itself. Every outcome is reported to
//! the terminal status line and pushed to the browser.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use super::messages::{BuildMsg, WsMsg};
use crate::config::{KilnConfig, cfg, reload_config};
use crate::logger::{status_error, status_success, status_unchanged};
use crate::prune::{self, ImageRoots, SourceKind};
use crate::reload::{RebuildPlan, ReloadMessage};

pub struct BuildActor {
    rx: mpsc::Receiver<BuildMsg>,
    ws_tx: mpsc::Sender<WsMsg>,
    /// Last batch failed; the next success must clear the overlay.
    had_error: bool,
}

impl BuildActor {
    pub fn new(rx: mpsc::Receiver<BuildMsg>, ws_tx: mpsc::Sender<WsMsg>) -> Self {
        Self {
            rx,
            ws_tx,
            had_error: false,
        }
    }

    pub fn with_had_error(mut self, had_error: bool) -> Self {
        self.had_error = had_error;
        self
    }

    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                BuildMsg::Rebuild(plan) => self.on_rebuild(plan).await,
                BuildMsg::Shutdown => {
                    crate::debug!("build"; "shutting down");
                    break;
                }
            }
        }
    }

    async fn on_rebuild(&mut self, plan: RebuildPlan) {
        let reload = plan.config_changed.then(reload_config);
        self.apply(plan, reload, cfg()).await;
    }

    /// Apply a plan against `config`, given the outcome of reloading
    /// `kiln.toml` when the plan asked for it.
    ///
    /// Unlink hooks run even when the reload failed, with the config that
    /// was active before.
    async fn apply(&mut self, plan: RebuildPlan, reload: Option<Result<bool>>, config: Arc<KilnConfig>) {
        let start = Instant::now();
        let summary = plan.summary();
        crate::debug!("build"; "rebuild: {}", summary);

        let reload_error = match reload {
            Some(Ok(true)) => {
                crate::log!("config"; "reloaded");
                None
            }
            Some(Ok(false)) if plan.is_config_only() => {
                status_unchanged("kiln.toml unchanged");
                return;
            }
            Some(Ok(false)) => {
                crate::debug!("config"; "unchanged");
                None
            }
            Some(Err(e)) => Some(e),
            None => None,
        };

        let unlink_result = unlink_all(&config.build.image_roots(), &plan.unlinked).await;
        for (source, category) in &plan.removed_other {
            crate::log!("watch"; "{} removed: {}", category.name(), source.display());
        }

        if let Some(e) = reload_error {
            if let Err(unlink_err) = unlink_result {
                crate::log!("error"; "{:#}", unlink_err);
            }
            self.report_error("kiln.toml", &e).await;
            return;
        }

        let style_only = plan.is_style_only();
        let result = tokio::task::spawn_blocking(move || rebuild(&config, &plan))
            .await
            .context("build task panicked")
            .and_then(|r| r)
            .and(unlink_result);

        match result {
            Ok(()) => {
                if self.had_error {
                    self.had_error = false;
                    self.send(ReloadMessage::Clear).await;
                }
                status_success(&format!("rebuilt {} in {:?}", summary, start.elapsed()));
                let msg = if style_only {
                    ReloadMessage::Css
                } else {
                    ReloadMessage::reload(summary)
                };
                self.send(msg).await;
            }
            Err(e) => self.report_error(&summary, &e).await,
        }
    }

    async fn report_error(&mut self, what: &str, error: &anyhow::Error) {
        self.had_error = true;
        let detail = format!("{error:#}");
        status_error(&format!("failed: {what}"), &detail);
        self.send(ReloadMessage::error(what, detail)).await;
    }

    async fn send(&self, msg: ReloadMessage) {
        if self.ws_tx.send(WsMsg::Broadcast(msg)).await.is_err() {
            crate::debug!("build"; "ws actor gone");
        }
    }
}

/// Run the unlink hook for every removed source, returning the first failure.
async fn unlink_all(roots: &ImageRoots, unlinked: &[(PathBuf, SourceKind)]) -> Result<()> {
    let mut first_err = None;
    for (source, kind) in unlinked {
        let mut outcome = Ok(());
        prune::on_unlink(roots, source, *kind, |result| match result {
            Ok(removed) => {
                for path in removed {
                    crate::debug!("prune"; "removed {}", path.display());
                }
            }
            Err(e) => outcome = Err(e),
        })
        .await;

        if let Err(e) = outcome {
            let e = anyhow::Error::new(e).context(format!("failed to remove outputs of {}", source.display()));
            match first_err {
                None => first_err = Some(e),
                Some(_) => crate::log!("error"; "{:#}", e),
            }
        }
    }
    first_err.map_or(Ok(()), Err)
}

/// Run the transforms a plan asks for. A config change rebuilds everything.
fn rebuild(config: &KilnConfig, plan: &RebuildPlan) -> Result<()> {
    if plan.config_changed {
        use crate::cli::build::{BuildOptions, build_site};
        return build_site(config, BuildOptions::forced());
    }

    let build = &config.build;
    let mut first_err = None;
    let mut record = |result: Result<()>| {
        if let Err(e) = result {
            first_err.get_or_insert(e);
        }
    };

    if !plan.html.is_empty() {
        record(asset_copy(&plan.html, |files| {
            crate::asset::copy::copy_html(build, files, true)
        }));
    }
    if plan.style {
        record(crate::asset::style::compile_all(build).map(drop));
    }
    if !plan.script.is_empty() {
        record(asset_copy(&plan.script, |files| {
            crate::asset::copy::copy_js(build, files, true)
        }));
    }
    if !plan.images.is_empty() {
        let roots = build.image_roots();
        record(
            crate::image::plan(&roots, &build.images, &plan.images, true)
                .and_then(|jobs| crate::image::run(&jobs, &build.images, false))
                .map(drop),
        );
    }

    first_err.map_or(Ok(()), Err)
}

fn asset_copy<F>(files: &[PathBuf], copy: F) -> Result<()>
where
    F: FnOnce(&[PathBuf]) -> Result<crate::asset::TransformStats>,
{
    let stats = copy(files)?;
    crate::debug!("build"; "copied {} files", stats.written);
    Ok(())
}
