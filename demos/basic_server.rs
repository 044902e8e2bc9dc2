//! The reference configuration: one route on port 8080.
//!
//! Run with `cargo run --example basic_server`, then:
//!
//! ```text
//! curl -v http://127.0.0.1:8080/
//! curl -v http://127.0.0.1:8080/missing
//! ```

use log::info;
use microroute_rs::{Router, ServerConfig, TcpServer};
use tokio::io::AsyncWriteExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize the logger
    env_logger::init();

    // Register handler functions for specific routes
    let mut router = Router::new();
    router.register("/", |_req, mut conn| async move {
        let response = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<h1>Hello Dev</h1>";
        let _ = conn.write_all(response.as_bytes()).await;
    });

    info!("Starting server on http://127.0.0.1:8080");

    // Start listening on port 8080
    let server = TcpServer::new(ServerConfig::default(), router);
    server.start().await?;

    Ok(())
}
