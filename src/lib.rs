//! A minimal TCP connection router.
//!
//! This library accepts raw TCP connections, decodes a single HTTP-like
//! request from each (request line, headers, optional `Content-Length`
//! body), and dispatches the connection to a handler registered for the
//! exact request path.
//!
//! # Features
//!
//! - Streaming request decoding from any buffered async byte stream
//! - Exact-path route table, built once before serving, lock-free at lookup
//! - One task per connection; the handler owns the connection outright
//! - Fixed default response when no route matches
//! - JSON helpers for request and response bodies
//! - Proper error handling with descriptive error messages
//!
//! # Examples
//!
//! ## Running a server
//!
//! ```no_run
//! use microroute_rs::{Router, ServerConfig, TcpServer};
//! use tokio::io::AsyncWriteExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), microroute_rs::ServerError> {
//!     let mut router = Router::new();
//!     router.register("/", |_req, mut conn| async move {
//!         let response = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<h1>Hello Dev</h1>";
//!         let _ = conn.write_all(response.as_bytes()).await;
//!     });
//!
//!     let server = TcpServer::new(ServerConfig::default(), router);
//!     server.start().await
//! }
//! ```
//!
//! ## Decoding a request by hand
//!
//! ```
//! use microroute_rs::{parse_request, ParserError};
//! use tokio::io::BufReader;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let wire = b"POST /x HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
//! let mut reader = BufReader::new(&wire[..]);
//!
//! match parse_request(&mut reader).await {
//!     Ok(request) => {
//!         assert_eq!(request.method, "POST");
//!         assert_eq!(request.path, "/x");
//!         assert_eq!(request.body, b"hello");
//!     }
//!     Err(ParserError::MalformedRequestLine(line)) => {
//!         println!("Malformed request line: {line}");
//!     }
//!     Err(err) => println!("Other error: {err}"),
//! }
//! # }
//! ```
//!
//! See the `demos` directory for complete runnable servers.

// Export the parser module
pub mod parser;

// Export the server module
pub mod server;

// Re-export commonly used items for convenience
pub use parser::{parse_request, Error as ParserError, Request};
pub use server::{
    BoxConnection, Connection, Error as ServerError, HttpResponse, Router, ServerConfig,
    StatusCode, TcpServer, ROUTE_NOT_FOUND_RESPONSE,
};
