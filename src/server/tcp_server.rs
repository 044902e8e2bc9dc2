//! TCP server implementation: accept loop, connection handling, dispatch.

use std::sync::Arc;

use log::{debug, info, trace, warn};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use crate::parser::{parse_request, Error as ParserError, Request};
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::response::ROUTE_NOT_FOUND_RESPONSE;
use crate::server::router::{BoxConnection, Router};

/// A TCP server that decodes one request per connection and routes it by
/// exact path match.
///
/// The route table is built before the server starts and never changes
/// afterwards; each accepted connection is handed to its own task, which
/// owns the connection for its whole lifetime and closes it on every exit
/// path. There is no connection limit and no read or write timeout, so a
/// slow client holds its task open indefinitely.
pub struct TcpServer {
    /// The server configuration.
    pub config: ServerConfig,
    /// The route table.
    router: Arc<Router>,
}

impl TcpServer {
    /// Create a new server from a configuration and a fully built route
    /// table.
    pub fn new(config: ServerConfig, router: Router) -> Self {
        Self {
            config,
            router: Arc::new(router),
        }
    }

    /// Bind the configured address and serve connections until a fatal
    /// error occurs.
    pub async fn start(&self) -> Result<(), Error> {
        let addr = self.config.addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| Error::Bind { addr, source })?;
        info!("Server listening on {addr}");

        info!("Registered routes:");
        for route in self.router.routes() {
            info!("  {}", route.pattern);
        }

        self.serve(listener).await
    }

    /// Serve connections from an already bound listener.
    ///
    /// Accept errors are fatal: the loop exits, the listener is dropped,
    /// and the error is returned to the caller. Everything that goes wrong
    /// on an individual connection stays inside that connection's task.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), Error> {
        loop {
            let (socket, addr) = listener.accept().await.map_err(Error::Accept)?;
            debug!("Connection from {addr}");

            let router = self.router.clone();
            let read_buffer_size = self.config.read_buffer_size;

            tokio::spawn(async move {
                if let Err(e) = Self::handle_connection(socket, &router, read_buffer_size).await {
                    // No response is written for these; the connection just
                    // closes.
                    warn!("Closing connection from {addr}: {e}");
                }
            });
        }
    }

    /// Handle a single connection: decode one request, dispatch it, done.
    ///
    /// The socket is dropped (and the connection closed) on every path out
    /// of this function, whether decoding succeeded or not.
    pub(crate) async fn handle_connection<S>(
        socket: S,
        router: &Router,
        read_buffer_size: usize,
    ) -> Result<(), ParserError>
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let mut reader = BufReader::with_capacity(read_buffer_size, socket);
        let request = parse_request(&mut reader).await?;

        // Body bytes were already consumed through the buffer; the handler
        // gets the raw socket back.
        let socket = reader.into_inner();
        Self::dispatch(request, Box::new(socket), router).await;
        Ok(())
    }

    /// Route a decoded request to its handler, or write the default
    /// response when nothing matches.
    ///
    /// Lookup is by path only; the method plays no part in routing. A
    /// matching handler receives the request and the owned connection and
    /// is trusted with both; nothing it writes (or fails to write) is
    /// inspected here.
    async fn dispatch(request: Request, mut conn: BoxConnection, router: &Router) {
        match router.lookup(&request.path) {
            Some(route) => {
                trace!(
                    "Dispatching {method} {path}",
                    method = request.method,
                    path = request.path
                );
                (route.handler)(request, conn).await;
            }
            None => {
                trace!("No route for {path}", path = request.path);
                if let Err(e) = conn.write_all(ROUTE_NOT_FOUND_RESPONSE).await {
                    debug!("Failed to write default response: {e}");
                }
            }
        }
    }
}
