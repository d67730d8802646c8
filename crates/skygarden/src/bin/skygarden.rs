//! SkyGarden WebSocket server.
//!
//! Configured from `SKYGARDEN_*` environment variables; log filtering via
//! `RUST_LOG` (default `info`).

use skygarden::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), SkygardenError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::from_env()?;
    let auth = MockAuthenticator::new(config.auth());

    match config.data_dir.clone() {
        Some(dir) => {
            let storage = FileStorage::open(dir.clone()).await?;
            tracing::info!(dir = %dir.display(), "persisting sessions to disk");
            serve(config, auth, storage).await
        }
        None => {
            tracing::warn!("SKYGARDEN_DATA_DIR not set; sessions last until restart");
            serve(config, auth, MemoryStorage::new()).await
        }
    }
}

async fn serve<S: Storage>(
    config: ServerConfig,
    auth: MockAuthenticator,
    storage: S,
) -> Result<(), SkygardenError> {
    let server = SkygardenServerBuilder::new()
        .config(config)
        .build(auth, storage)
        .await?;
    server.run().await
}
