//! TCP route server for microroute-rs.
//!
//! This module provides the accept loop, per-connection dispatch, and the
//! route table the dispatcher consults.

mod config;
mod error;
mod response;
mod router;
mod tcp_server;
mod tests;

// Re-export public items
pub use config::ServerConfig;
pub use error::Error;
pub use response::{HttpResponse, StatusCode, ROUTE_NOT_FOUND_RESPONSE};
pub use router::{BoxConnection, Connection, HandlerFn, HandlerFuture, Route, Router};
pub use tcp_server::TcpServer;
