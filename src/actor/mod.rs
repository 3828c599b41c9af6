//! Actor system for watch mode.
//!
//! ```text
//! FsActor --Rebuild--> BuildActor --Broadcast--> WsActor
//! (watch)              (transforms,              (browsers)
//!                       unlink hooks)
//! ```
//!
//! - `messages` - message types between actors
//! - `fs` - file watcher with debouncing and classification
//! - `build` - runs transforms and prune hooks for each batch
//! - `ws` - WebSocket clients and broadcast
//! - `coordinator` - wires up and runs the actors

pub mod build;
pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod ws;

pub use coordinator::Coordinator;
