//! Unified error type for SkyGarden.

use skygarden_protocol::ProtocolError;
use skygarden_router::ViewError;
use skygarden_session::SessionError;
use skygarden_storage::StorageError;

/// Top-level error wrapping every crate-specific error.
///
/// The `#[from]` attribute on each variant lets `?` convert sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum SkygardenError {
    /// Encode/decode failure or a malformed client message.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Durable storage refused a read or write.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Session operation failed (not signed in, persistence).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Rejected view-state edit (unknown tab, panel, field).
    #[error(transparent)]
    View(#[from] ViewError),

    /// WebSocket send/recv/handshake failure.
    #[error(transparent)]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    /// Binding the listener or another socket-level failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Bad environment configuration.
    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),
}

impl SkygardenError {
    /// Code carried in a wire `error` message.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Protocol(_) | Self::Config(_) => 400,
            Self::Session(SessionError::NotAuthenticated) => 401,
            Self::View(_) => 422,
            Self::Session(_) | Self::Storage(_) | Self::Transport(_) | Self::Io(_) => 500,
        }
    }
}
