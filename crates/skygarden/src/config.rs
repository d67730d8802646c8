//! Server configuration.
//!
//! Loaded with figment: built-in defaults, then `SKYGARDEN_*` environment
//! variables on top. Nested tables use `__`, so
//! `SKYGARDEN_SESSION__STORAGE_KEY` sets `session.storage_key`.

use std::path::PathBuf;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};
use skygarden_session::{MockAuthConfig, SessionConfig};

use crate::SkygardenError;

/// Everything the server needs to start.
///
/// `Default` gives a loopback server with in-memory storage and the
/// demo's artificial auth latency.
///
/// | variable                       | field               |
/// |--------------------------------|---------------------|
/// | `SKYGARDEN_BIND`               | `bind_addr`         |
/// | `SKYGARDEN_DATA_DIR`           | `data_dir`          |
/// | `SKYGARDEN_IDLE_TIMEOUT_SECS`  | `idle_timeout_secs` |
/// | `SKYGARDEN_LOGIN_LATENCY_MS`   | `login_latency_ms`  |
/// | `SKYGARDEN_LOGOUT_LATENCY_MS`  | `logout_latency_ms` |
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.
    #[serde(rename = "bind")]
    pub bind_addr: String,

    /// Directory for persisted identities. `None` keeps them in memory
    /// for the life of the process.
    pub data_dir: Option<PathBuf>,

    /// A connection that sends nothing for this long is closed.
    pub idle_timeout_secs: u64,

    pub login_latency_ms: u64,

    pub logout_latency_ms: u64,

    pub session: SessionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let auth = MockAuthConfig::default();
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            data_dir: None,
            idle_timeout_secs: 300,
            login_latency_ms: millis(auth.login_latency),
            logout_latency_ms: millis(auth.logout_latency),
            session: SessionConfig::default(),
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl ServerConfig {
    /// The provider chain: defaults, then `SKYGARDEN_*` variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed("SKYGARDEN_").split("__"))
    }

    /// Extracts the configuration from [`figment`](Self::figment). Unset
    /// variables keep their defaults; an empty `SKYGARDEN_DATA_DIR` means
    /// in-memory storage.
    pub fn from_env() -> Result<Self, SkygardenError> {
        let mut config: Self = Self::figment().extract()?;
        config.data_dir = config.data_dir.filter(|d| !d.as_os_str().is_empty());
        Ok(config)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Mock provider settings with this config's latencies.
    pub fn auth(&self) -> MockAuthConfig {
        MockAuthConfig {
            login_latency: Duration::from_millis(self.login_latency_ms),
            logout_latency: Duration::from_millis(self.logout_latency_ms),
            ..MockAuthConfig::default()
        }
    }
}
