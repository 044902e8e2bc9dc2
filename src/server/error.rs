//! Error types for the server.

use std::net::SocketAddr;

use thiserror::Error;

/// Errors that are fatal to the whole server.
///
/// Per-connection failures never surface here: a connection whose request
/// can't be decoded is logged and closed inside its own task (see
/// [`crate::parser::Error`]), and an unmatched route is a normal branch that
/// produces the default response. The variants below end the server.
#[derive(Debug, Error)]
pub enum Error {
    /// Binding the listening socket failed.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// Accepting a connection failed. The accept loop exits and the
    /// listener is released.
    #[error("Failed to accept connection: {0}")]
    Accept(#[source] std::io::Error),
}
