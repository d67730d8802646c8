//! `SkygardenServer` builder and accept loop.
//!
//! Each accepted connection is one browser tab: it gets its own
//! [`Shell`](crate::Shell) and session store, scoped in durable storage by
//! the `client_id` it sends in its `hello`.

use std::net::SocketAddr;
use std::sync::Arc;

use skygarden_protocol::JsonCodec;
use skygarden_router::RouteTable;
use skygarden_session::Authenticator;
use skygarden_storage::Storage;
use tokio::net::TcpListener;

use crate::handler::handle_connection;
use crate::{ServerConfig, SkygardenError};

/// State shared by every connection task.
pub(crate) struct ServerState<A, S> {
    pub(crate) auth: Arc<A>,
    pub(crate) storage: Arc<S>,
    pub(crate) routes: RouteTable,
    pub(crate) config: ServerConfig,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a server.
///
/// # Example
///
/// ```rust,no_run
/// use skygarden::prelude::*;
///
/// # async fn run() -> Result<(), SkygardenError> {
/// let config = ServerConfig::default();
/// let auth = MockAuthenticator::new(config.auth());
/// let server = SkygardenServerBuilder::new()
///     .config(config)
///     .build(auth, MemoryStorage::new())
///     .await?;
/// server.run().await
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SkygardenServerBuilder {
    config: ServerConfig,
    routes: RouteTable,
}

impl SkygardenServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the address to bind to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets which routes demand which role.
    pub fn routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    /// Binds the listener.
    pub async fn build<A, S>(
        self,
        auth: A,
        storage: S,
    ) -> Result<SkygardenServer<A, S>, SkygardenError>
    where
        A: Authenticator,
        S: Storage,
    {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "listening");

        let state = Arc::new(ServerState {
            auth: Arc::new(auth),
            storage: Arc::new(storage),
            routes: self.routes,
            config: self.config,
            codec: JsonCodec,
        });

        Ok(SkygardenServer { listener, state })
    }
}

/// A bound server. Call [`run`](Self::run) to start accepting.
pub struct SkygardenServer<A, S> {
    listener: TcpListener,
    state: Arc<ServerState<A, S>>,
}

impl<A: Authenticator, S: Storage> SkygardenServer<A, S> {
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until the process ends, one task per
    /// connection.
    pub async fn run(self) -> Result<(), SkygardenError> {
        tracing::info!("skygarden server running");

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, state).await {
                            tracing::debug!(%addr, error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
