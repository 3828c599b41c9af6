//! Live reload: the browser-facing protocol and the WebSocket listener.
//!
//! ```text
//! FsActor -> BuildActor -> WsActor -> Browser
//!  (watch)    (rebuild)   (broadcast)
//! ```

pub mod classify;
pub mod message;
pub mod server;

pub use classify::{RebuildPlan, classify_changes};
pub use message::ReloadMessage;
