//! A server that echoes request bodies and serves a JSON route, using the
//! response builder instead of hand-written bytes.
//!
//! Run with `cargo run --example echo_server`, then:
//!
//! ```text
//! curl -v -d 'hello there' http://127.0.0.1:8082/echo
//! curl -v http://127.0.0.1:8082/info
//! ```

use log::{info, warn};
use microroute_rs::{HttpResponse, Router, ServerConfig, StatusCode, TcpServer};
use serde::Serialize;
use tokio::io::AsyncWriteExt;

#[derive(Serialize)]
struct ServerInfo {
    name: &'static str,
    version: &'static str,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut router = Router::new();

    // Echo the request body back as plain text.
    router.register("/echo", |req, mut conn| async move {
        let body = String::from_utf8_lossy(&req.body).into_owned();
        let response = HttpResponse::new(StatusCode::Ok)
            .with_content_type("text/plain")
            .with_body_string(body);
        if let Err(e) = conn.write_all(&response.to_bytes()).await {
            warn!("Failed to write echo response: {e}");
        }
    });

    // A JSON route built with the response builder.
    router.register("/info", |_req, mut conn| async move {
        let payload = ServerInfo {
            name: "microroute-rs",
            version: env!("CARGO_PKG_VERSION"),
        };
        let response = match HttpResponse::new(StatusCode::Ok).with_json(&payload) {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Failed to serialize info payload: {e}");
                HttpResponse::new(StatusCode::InternalServerError)
                    .with_content_type("text/plain")
                    .with_body_string("serialization error")
            }
        };
        let _ = conn.write_all(&response.to_bytes()).await;
    });

    let config = ServerConfig {
        addr: "127.0.0.1:8082".parse()?,
        read_buffer_size: 4096,
    };

    info!("Starting echo server on http://{}", config.addr);

    let server = TcpServer::new(config, router);
    server.start().await?;

    Ok(())
}
