//! Routes, handlers, and the route table.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::parser::Request;

/// A bidirectional byte stream a handler can read from and write to.
///
/// Implemented for anything that is both `AsyncRead` and `AsyncWrite`, which
/// covers `tokio::net::TcpStream` as well as in-memory streams in tests.
pub trait Connection: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> Connection for T {}

/// An owned connection, handed to a handler for its exclusive use.
///
/// Dropping it closes the connection, so a handler that returns without
/// writing anything simply hangs up.
pub type BoxConnection = Box<dyn Connection>;

/// Type alias for a boxed future returned by a handler.
pub type HandlerFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Type alias for a handler function.
///
/// A handler consumes the decoded request together with the owned
/// connection and is solely responsible for whatever response bytes (if
/// any) it writes.
pub type HandlerFn = Arc<dyn Fn(Request, BoxConnection) -> HandlerFuture + Send + Sync>;

/// A registered route: an exact path paired with its handler.
#[derive(Clone)]
pub struct Route {
    /// The exact path to match; no wildcards, no normalization.
    pub pattern: String,
    /// The handler function.
    pub handler: HandlerFn,
}

/// An ordered route table.
///
/// Routes are matched by exact string equality against the request path, in
/// registration order; when the same pattern is registered twice, the first
/// registration wins. The table is built up-front and never changes while
/// the server runs, so lookups need no locking.
#[derive(Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Create an empty route table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an exact path.
    ///
    /// # Examples
    ///
    /// ```
    /// use microroute_rs::Router;
    /// use tokio::io::AsyncWriteExt;
    ///
    /// let mut router = Router::new();
    /// router.register("/", |_req, mut conn| async move {
    ///     let _ = conn
    ///         .write_all(b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<h1>Hello Dev</h1>")
    ///         .await;
    /// });
    /// ```
    pub fn register<F, Fut>(&mut self, pattern: impl Into<String>, handler: F)
    where
        F: Fn(Request, BoxConnection) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler = Arc::new(move |req: Request, conn: BoxConnection| -> HandlerFuture {
            Box::pin(handler(req, conn))
        });

        self.routes.push(Route {
            pattern: pattern.into(),
            handler,
        });
    }

    /// Find the first route whose pattern exactly equals `path`.
    pub fn lookup(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.pattern == path)
    }

    /// All registered routes, in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}
