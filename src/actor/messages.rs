//! Actor message definitions.

use std::net::TcpStream;

use crate::reload::{RebuildPlan, ReloadMessage};

/// Messages to the BuildActor.
#[derive(Debug)]
pub enum BuildMsg {
    /// A classified, debounced batch of source changes.
    Rebuild(RebuildPlan),
    Shutdown,
}

/// Messages to the WsActor.
#[derive(Debug)]
pub enum WsMsg {
    /// Send to every connected client.
    Broadcast(ReloadMessage),
    /// Accepted TCP connection awaiting the WebSocket handshake.
    AddClient(TcpStream),
    Shutdown,
}
