//! WebSocket Actor - browser connections
//!
//! ```text
//! BuildActor --[Broadcast]--> WsActor --> Clients
//! ```
//!
//! The last build error is kept and replayed to clients that connect
//! while it is unresolved, so a page opened after a failed build still
//! shows the overlay.

use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::messages::WsMsg;
use crate::reload::ReloadMessage;

type Clients = Arc<Mutex<Vec<WebSocket<TcpStream>>>>;

pub struct WsActor {
    rx: mpsc::Receiver<WsMsg>,
    /// Shared with the reader thread
    clients: Clients,
    pending_error: Option<ReloadMessage>,
}

impl WsActor {
    pub fn new(rx: mpsc::Receiver<WsMsg>) -> Self {
        Self {
            rx,
            clients: Arc::new(Mutex::new(Vec::new())),
            pending_error: None,
        }
    }

    pub fn with_pending_error(mut self, error: Option<ReloadMessage>) -> Self {
        self.pending_error = error;
        self
    }

    pub async fn run(mut self) {
        let clients_for_reader = Arc::clone(&self.clients);
        std::thread::spawn(move || client_reader_loop(clients_for_reader));

        while let Some(msg) = self.rx.recv().await {
            match msg {
                WsMsg::Broadcast(message) => {
                    match &message {
                        ReloadMessage::Error { .. } => self.pending_error = Some(message.clone()),
                        ReloadMessage::Clear => self.pending_error = None,
                        _ => {}
                    }
                    self.broadcast(&message);
                }
                WsMsg::AddClient(stream) => self.add_client(stream),
                WsMsg::Shutdown => {
                    crate::debug!("ws"; "shutting down");
                    for mut ws in self.clients.lock().drain(..) {
                        let _ = ws.close(None);
                    }
                    break;
                }
            }
        }
    }

    fn add_client(&self, stream: TcpStream) {
        // handshake in blocking mode, then poll reads
        let mut ws = match tungstenite::accept(stream) {
            Ok(ws) => ws,
            Err(e) => {
                crate::log!("ws"; "handshake failed: {}", e);
                return;
            }
        };
        let _ = ws.get_ref().set_nonblocking(true);

        if let Err(e) = ws.send(text(&ReloadMessage::connected())) {
            crate::log!("ws"; "failed to send connected message: {}", e);
            return;
        }

        if let Some(error) = &self.pending_error {
            match ws.send(text(error)) {
                Ok(()) => crate::debug!("ws"; "sent pending error to new client"),
                Err(e) => crate::log!("ws"; "failed to send pending error: {}", e),
            }
        }

        let mut clients = self.clients.lock();
        clients.push(ws);
        crate::debug!("ws"; "client connected (total: {})", clients.len());
    }

    fn broadcast(&self, message: &ReloadMessage) {
        let mut clients = self.clients.lock();
        if clients.is_empty() {
            crate::debug!("ws"; "no clients connected");
            return;
        }

        let msg = text(message);
        clients.retain_mut(|ws| match ws.send(msg.clone()) {
            Ok(()) => true,
            Err(e) => {
                crate::debug!("ws"; "client disconnected: {}", e);
                false
            }
        });
        crate::debug!("ws"; "broadcast to {} clients", clients.len());
    }
}

fn text(message: &ReloadMessage) -> Message {
    Message::Text(message.to_json().into())
}

/// Drain incoming frames so closed connections are noticed and dropped.
fn client_reader_loop(clients: Clients) {
    while !crate::core::is_shutdown() {
        std::thread::sleep(Duration::from_millis(100));

        clients.lock().retain_mut(|ws| match ws.read() {
            Ok(Message::Close(_)) => false,
            Ok(_) => true,
            Err(tungstenite::Error::Io(ref e)) if e.kind() == std::io::ErrorKind::WouldBlock => true,
            Err(_) => false,
        });
    }
}
