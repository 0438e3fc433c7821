//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_SESSION_TTL_SECS: u64 = 2 * 60 * 60;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Sessions nobody touched for this long are reaped.
    pub session_ttl: Duration,
}

impl ServerConfig {
    /// Load config from HASLO_ADDR and HASLO_SESSION_TTL_SECS, falling back
    /// to defaults for anything unset, empty, or unparseable.
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("HASLO_ADDR")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .and_then(|s| match s.parse() {
                Ok(addr) => Some(addr),
                Err(_) => {
                    tracing::warn!("Ignoring unparseable HASLO_ADDR: {}", s);
                    None
                }
            })
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)));

        let session_ttl = std::env::var("HASLO_SESSION_TTL_SECS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_SESSION_TTL_SECS));

        Self {
            bind_addr,
            session_ttl,
        }
    }
}
