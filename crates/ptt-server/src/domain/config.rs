//! Server runtime configuration.
//!
//! [`ServerConfig`] is built once at startup from `config.json` plus the
//! command line, then shared read-only by every task.  Nothing in the server
//! re-reads the file afterwards.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use ptt_core::KeyIdentifier;

/// All runtime configuration for the relay.
///
/// # Example
///
/// ```rust
/// use ptt_server::domain::ServerConfig;
///
/// let cfg = ServerConfig::default();
/// assert_eq!(cfg.ws_bind_addr.port(), 8765);
/// assert_eq!(cfg.ptt_key.name(), "caps_lock");
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address of the static page server.
    pub http_bind_addr: SocketAddr,

    /// Address of the WebSocket control channel.
    pub ws_bind_addr: SocketAddr,

    /// How often each session sends a WebSocket Ping to its browser.
    pub ping_interval: Duration,

    /// A session that has not sent any frame for this long is pruned as if it
    /// had disconnected, which releases the key if it is held.
    pub ping_timeout: Duration,

    /// How long a new connection may take to complete the WebSocket
    /// handshake before it is dropped.
    pub handshake_timeout: Duration,

    /// The key held down while PTT is on.
    pub ptt_key: KeyIdentifier,
}

impl ServerConfig {
    /// Port the browser must open the control channel on.
    pub fn ws_port(&self) -> u16 {
        self.ws_bind_addr.port()
    }
}

impl Default for ServerConfig {
    /// | Field             | Default          |
    /// |-------------------|------------------|
    /// | http_bind_addr    | `0.0.0.0:8080`   |
    /// | ws_bind_addr      | `0.0.0.0:8765`   |
    /// | ping_interval     | 20 seconds       |
    /// | ping_timeout      | 45 seconds       |
    /// | handshake_timeout | 10 seconds       |
    /// | ptt_key           | `caps_lock`      |
    fn default() -> Self {
        Self {
            http_bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080)),
            ws_bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8765)),
            ping_interval: Duration::from_secs(20),
            ping_timeout: Duration::from_secs(45),
            handshake_timeout: Duration::from_secs(10),
            ptt_key: KeyIdentifier::default(),
        }
    }
}
