//! Server configuration.

use std::net::SocketAddr;

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// The address to bind to.
    pub addr: SocketAddr,
    /// The read buffer size used for each connection.
    pub read_buffer_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".parse().unwrap(),
            read_buffer_size: 8192,
        }
    }
}
