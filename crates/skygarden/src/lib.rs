//! # SkyGarden
//!
//! Marketplace shell with mock authentication and role-based dashboards,
//! served over WebSocket.
//!
//! The layers, bottom-up:
//!
//! - `skygarden-protocol`: identities, roles, auth requests, the codec
//! - `skygarden-storage`: durable key/value storage (memory, files)
//! - `skygarden-session`: the session store and mock authenticator
//! - `skygarden-router`: auth gate, role routing, view models
//! - this crate: the [`Shell`] (one per browser tab) and the server
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use skygarden::prelude::*;
//!
//! # async fn run() -> Result<(), SkygardenError> {
//! let config = ServerConfig::from_env()?;
//! let auth = MockAuthenticator::new(config.auth());
//! let server = SkygardenServerBuilder::new()
//!     .config(config)
//!     .build(auth, MemoryStorage::new())
//!     .await?;
//! server.run().await
//! # }
//! ```

mod app;
mod config;
mod connection;
mod error;
mod handler;
mod server;
mod wire;

pub use app::{Frame, Shell};
pub use config::ServerConfig;
pub use connection::ConnectionId;
pub use error::SkygardenError;
pub use server::{SkygardenServer, SkygardenServerBuilder};
pub use wire::{ClientMessage, ServerMessage};

/// Everything needed to embed a shell or run a server.
pub mod prelude {
    pub use crate::{
        ClientMessage, Frame, ServerConfig, ServerMessage, Shell, SkygardenError,
        SkygardenServer, SkygardenServerBuilder,
    };
    pub use skygarden_protocol::{
        AuthRequest, Codec, Envelope, Identity, JsonCodec, LoginRequest, RegisterRequest, Role,
        UserId,
    };
    pub use skygarden_router::{
        AuthGate, DashboardView, GateDecision, MarketingSuite, RoleRouter, Route, RouteTable,
        View, ViewError,
    };
    pub use skygarden_session::{
        AuthError, Authenticator, MockAuthConfig, MockAuthenticator, SessionConfig,
        SessionError, SessionSnapshot, SessionStore,
    };
    pub use skygarden_storage::{FileStorage, MemoryStorage, ScopedStorage, Storage, StorageError};
}
