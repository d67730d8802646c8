//! Messages exchanged over the WebSocket.
//!
//! Both directions are JSON objects tagged by `"type"`. Server messages
//! travel inside an [`Envelope`](skygarden_protocol::Envelope) carrying a
//! per-connection sequence number.

use serde::{Deserialize, Serialize};
use skygarden_protocol::{LoginRequest, RegisterRequest};

use crate::Frame;

/// Client → server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Must be first. `client_id` scopes this client's persisted session.
    Hello { client_id: String },
    Login(LoginRequest),
    Register(RegisterRequest),
    Logout,
    SwitchRole { role: String },
    Navigate { path: String },
    SelectPanel { panel: String },
    SelectTab { tab: String },
    EditDraft { field: String, value: String },
    /// Re-render without changing anything.
    Refresh,
}

/// Server → client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Frame(Frame),
    Error { code: u16, message: String },
}
