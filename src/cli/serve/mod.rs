//! Development server with live reload support.
//!
//! `dist` is served as static files; HTML responses get the hot reload
//! client injected when watching.

mod content;
mod lifecycle;
mod path;
mod response;

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};

use anyhow::{Context, Result};
use crossbeam::channel;
use tiny_http::{Request, Server};

use crate::config::{KilnConfig, cfg};
use crate::reload::ReloadMessage;
use crate::{debug, log};

/// WebSocket port actually bound; may differ from `serve.ws_port` after retry.
static ACTUAL_WS_PORT: AtomicU16 = AtomicU16::new(0);

pub fn set_actual_ws_port(port: u16) {
    ACTUAL_WS_PORT.store(port, Ordering::Relaxed);
}

/// `None` until the WebSocket listener is up.
fn actual_ws_port() -> Option<u16> {
    match ACTUAL_WS_PORT.load(Ordering::Relaxed) {
        0 => None,
        port => Some(port),
    }
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
    shutdown_rx: channel::Receiver<()>,
}

/// Bind the HTTP server without starting the request loop.
pub fn bind_server() -> Result<BoundServer> {
    let config = cfg();
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    crate::core::register_server(Arc::clone(&server), shutdown_tx);

    log!("serve"; "http://{}", addr);

    Ok(BoundServer {
        server,
        addr,
        shutdown_rx,
    })
}

impl BoundServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the actors and the request loop (blocking until shutdown).
    ///
    /// `initial_error` is the failed first build, if any.
    pub fn run(self, initial_error: Option<ReloadMessage>) -> Result<()> {
        let config = cfg();
        let actor_handle =
            lifecycle::spawn_actors(config.serve.watch, self.shutdown_rx, initial_error);
        run_request_loop(&self.server)?;
        if let Some(handle) = actor_handle {
            lifecycle::wait_for_shutdown(handle);
        }
        Ok(())
    }
}

/// Build everything, then serve `dist` and watch `src`.
pub fn run_serve(config: &KilnConfig) -> Result<()> {
    use crate::cli::build::{BuildOptions, build_site};
    let initial_error = match build_site(config, BuildOptions::incremental()) {
        Ok(()) => None,
        Err(e) if config.serve.watch => {
            let detail = format!("{e:#}");
            crate::logger::status_error("initial build failed", &detail);
            Some(ReloadMessage::error("build", detail))
        }
        Err(e) => return Err(e),
    };

    let bound = bind_server()?;
    debug!("serve"; "listening on {}", bound.addr());
    bound.run(initial_error)
}

fn run_request_loop(server: &Server) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .context("failed to create request thread pool")?;

    for request in server.incoming_requests() {
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &cfg()) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

fn handle_request(request: Request, config: &KilnConfig) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    if !response::is_read_request(&request) {
        return response::respond_method_not_allowed(request);
    }

    let ws_port = actual_ws_port();
    if let Some(port) = ws_port
        && path::strip_query(request.url()) == content::HOTRELOAD_PATH
    {
        return response::respond_hotreload_js(request, port);
    }

    match path::resolve_path(request.url(), &config.build.dist) {
        Some(path) => response::respond_file(request, &path, ws_port),
        None => response::respond_not_found(request, config, ws_port),
    }
}
