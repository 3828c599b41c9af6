//! JSON messages pushed to the injected browser client.

use serde::{Deserialize, Serialize};

/// Hot reload message sent over WebSocket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReloadMessage {
    /// Full page reload.
    Reload {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// Stylesheets changed; re-fetch them without reloading.
    Css,
    /// Build failed; show the overlay.
    Error { path: String, error: String },
    /// Build recovered; hide the overlay.
    Clear,
    /// Sent once after the handshake.
    Connected { version: String },
}

impl ReloadMessage {
    pub fn reload(reason: impl Into<String>) -> Self {
        Self::Reload {
            reason: Some(reason.into()),
        }
    }

    pub fn error(path: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Error {
            path: path.into(),
            error: error.into(),
        }
    }

    pub fn connected() -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"reload"}"#.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        assert_eq!(ReloadMessage::Css.to_json(), r#"{"type":"css"}"#);
        assert_eq!(ReloadMessage::Clear.to_json(), r#"{"type":"clear"}"#);
        assert_eq!(
            ReloadMessage::reload("html").to_json(),
            r#"{"type":"reload","reason":"html"}"#
        );
        assert_eq!(
            ReloadMessage::Reload { reason: None }.to_json(),
            r#"{"type":"reload"}"#
        );
        assert_eq!(
            ReloadMessage::error("sass/a.scss", "boom").to_json(),
            r#"{"type":"error","path":"sass/a.scss","error":"boom"}"#
        );
    }

    #[test]
    fn test_connected_carries_version() {
        let json = ReloadMessage::connected().to_json();
        assert!(json.starts_with(r#"{"type":"connected","version":""#));
    }
}
