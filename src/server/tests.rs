//! Tests for the server implementation.

#[cfg(test)]
mod server_tests {
    use std::io::{self, Cursor};
    use std::pin::Pin;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use std::task::{Context, Poll};

    use tokio::io::{AsyncRead, AsyncWrite, AsyncReadExt, AsyncWriteExt, ReadBuf};
    use tokio::net::{TcpListener, TcpStream};

    use crate::parser::{Error as ParserError, Request};
    use crate::server::{
        HttpResponse, Router, ServerConfig, StatusCode, TcpServer, ROUTE_NOT_FOUND_RESPONSE,
    };

    // Mock TcpStream for testing. Written bytes go to a shared sink so the
    // test keeps a handle after the stream has been moved into a handler.
    struct MockTcpStream {
        read_data: Cursor<Vec<u8>>,
        fail_when_drained: bool,
        write_data: Arc<Mutex<Vec<u8>>>,
    }

    impl MockTcpStream {
        fn new(read_data: &[u8]) -> (Self, Arc<Mutex<Vec<u8>>>) {
            Self::build(read_data, false)
        }

        // A stream that fails with an I/O error once its data is drained,
        // instead of reporting a clean EOF.
        fn with_read_error(read_data: &[u8]) -> (Self, Arc<Mutex<Vec<u8>>>) {
            Self::build(read_data, true)
        }

        fn build(read_data: &[u8], fail_when_drained: bool) -> (Self, Arc<Mutex<Vec<u8>>>) {
            let sink = Arc::new(Mutex::new(Vec::new()));
            let stream = Self {
                read_data: Cursor::new(read_data.to_vec()),
                fail_when_drained,
                write_data: sink.clone(),
            };
            (stream, sink)
        }
    }

    impl AsyncRead for MockTcpStream {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let this = self.get_mut();
            let n = std::io::Read::read(&mut this.read_data, buf.initialize_unfilled())?;
            if n == 0 && this.fail_when_drained {
                return Poll::Ready(Err(io::ErrorKind::ConnectionReset.into()));
            }
            buf.advance(n);
            Poll::Ready(Ok(()))
        }
    }

    impl AsyncWrite for MockTcpStream {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            let this = self.get_mut();
            this.write_data.lock().unwrap().extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[test]
    fn test_router_lookup_in_registration_order() {
        let mut router = Router::new();
        router.register("/a", |_req, _conn| async {});
        router.register("/b", |_req, _conn| async {});

        assert_eq!(router.routes().len(), 2);
        assert_eq!(router.routes()[0].pattern, "/a");
        assert_eq!(router.routes()[1].pattern, "/b");
        assert_eq!(router.lookup("/b").unwrap().pattern, "/b");
        assert!(router.lookup("/c").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_pattern_first_registration_wins() {
        let mut router = Router::new();
        router.register("/dup", |_req, mut conn| async move {
            let _ = conn.write_all(b"first").await;
        });
        router.register("/dup", |_req, mut conn| async move {
            let _ = conn.write_all(b"second").await;
        });

        let (stream, sink) = MockTcpStream::new(b"GET /dup HTTP/1.1\r\n\r\n");
        TcpServer::handle_connection(stream, &router, 1024)
            .await
            .unwrap();

        assert_eq!(&*sink.lock().unwrap(), b"first");
    }

    #[tokio::test]
    async fn test_exact_match_dispatches_regardless_of_method_and_headers() {
        let called = Arc::new(AtomicBool::new(false));
        let called_clone = called.clone();

        let mut router = Router::new();
        router.register("/x", move |_req, _conn| {
            let called = called_clone.clone();
            async move {
                called.store(true, Ordering::SeqCst);
            }
        });

        // Routing looks at the path only; method and headers are free-form.
        let (stream, _sink) =
            MockTcpStream::new(b"BREW /x COFFEE/1.0\r\nX-Strange: yes\r\n\r\n");
        TcpServer::handle_connection(stream, &router, 1024)
            .await
            .unwrap();

        assert!(called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_hello_dev_scenario_exact_bytes() {
        let mut router = Router::new();
        router.register("/", |_req, mut conn| async move {
            let response = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<h1>Hello Dev</h1>";
            let _ = conn.write_all(response.as_bytes()).await;
        });

        let (stream, sink) = MockTcpStream::new(b"GET / HTTP/1.1\r\n\r\n");
        TcpServer::handle_connection(stream, &router, 1024)
            .await
            .unwrap();

        assert_eq!(
            &*sink.lock().unwrap(),
            b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<h1>Hello Dev</h1>"
        );
    }

    #[tokio::test]
    async fn test_unmatched_path_gets_exact_default_response() {
        let mut router = Router::new();
        router.register("/", |_req, _conn| async {});

        let (stream, sink) = MockTcpStream::new(b"GET /missing HTTP/1.1\r\n\r\n");
        let result = TcpServer::handle_connection(stream, &router, 1024).await;

        // Route-not-found is a normal branch, not an error.
        assert!(result.is_ok());
        assert_eq!(&*sink.lock().unwrap(), ROUTE_NOT_FOUND_RESPONSE);
        assert_eq!(
            &*sink.lock().unwrap(),
            b"HTTP/1.1 400 OK\r\nContent-Type: text/html\r\n\r\n<h1>Route Not Found</h1>"
        );
    }

    #[tokio::test]
    async fn test_malformed_request_line_closes_with_zero_bytes_written() {
        let mut router = Router::new();
        router.register("/", |_req, mut conn| async move {
            let _ = conn.write_all(b"should never happen").await;
        });

        for request in [
            &b"GET /two-tokens\r\n\r\n"[..],
            &b"GET / HTTP/1.1 extra\r\n\r\n"[..],
        ] {
            let (stream, sink) = MockTcpStream::new(request);
            let result = TcpServer::handle_connection(stream, &router, 1024).await;

            assert!(matches!(
                result.unwrap_err(),
                ParserError::MalformedRequestLine(_)
            ));
            assert!(sink.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_body_read_failure_closes_with_zero_bytes_written() {
        let mut router = Router::new();
        router.register("/x", |_req, mut conn| async move {
            let _ = conn.write_all(b"should never happen").await;
        });

        // Headers complete, then the stream dies before the declared body.
        let (stream, sink) =
            MockTcpStream::with_read_error(b"POST /x HTTP/1.1\r\nContent-Length: 5\r\n\r\n");
        let result = TcpServer::handle_connection(stream, &router, 1024).await;

        assert!(matches!(result.unwrap_err(), ParserError::BodyReadError(_)));
        assert!(sink.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_request_line_read_failure_closes_with_zero_bytes_written() {
        let router = Router::new();

        let (stream, sink) = MockTcpStream::with_read_error(b"");
        let result = TcpServer::handle_connection(stream, &router, 1024).await;

        assert!(matches!(result.unwrap_err(), ParserError::RequestLineError(_)));
        assert!(sink.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_handler_receives_parsed_request_with_body_and_headers() {
        let seen: Arc<Mutex<Option<Request>>> = Arc::new(Mutex::new(None));
        let seen_clone = seen.clone();

        let mut router = Router::new();
        router.register("/x", move |req, _conn| {
            let seen = seen_clone.clone();
            async move {
                *seen.lock().unwrap() = Some(req);
            }
        });

        let (stream, _sink) =
            MockTcpStream::new(b"POST /x HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello");
        TcpServer::handle_connection(stream, &router, 1024)
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        let request = seen.as_ref().expect("handler was not invoked");
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/x");
        assert_eq!(request.body, b"hello");
        assert_eq!(request.headers.len(), 1);
        assert_eq!(
            request.headers.get("Content-Length"),
            Some(&"5".to_string())
        );
    }

    #[tokio::test]
    async fn test_concurrent_connections_receive_only_their_own_response() {
        let mut router = Router::new();
        for name in ["alpha", "beta", "gamma"] {
            let body = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\n{name}"
            );
            router.register(format!("/{name}"), move |_req, mut conn| {
                let body = body.clone();
                async move {
                    let _ = conn.write_all(body.as_bytes()).await;
                }
            });
        }

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = TcpServer::new(ServerConfig::default(), router);
        tokio::spawn(async move {
            let _ = server.serve(listener).await;
        });

        let mut clients = Vec::new();
        for name in ["alpha", "beta", "gamma"] {
            clients.push(tokio::spawn(async move {
                let mut stream = TcpStream::connect(addr).await.unwrap();
                let request = format!("GET /{name} HTTP/1.1\r\n\r\n");
                stream.write_all(request.as_bytes()).await.unwrap();

                let mut response = Vec::new();
                stream.read_to_end(&mut response).await.unwrap();
                (name, response)
            }));
        }

        for client in clients {
            let (name, response) = client.await.unwrap();
            let expected =
                format!("HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\n{name}");
            assert_eq!(response, expected.as_bytes(), "response for /{name}");
        }
    }

    #[test]
    fn test_status_code_reason_phrase() {
        assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
        assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
        assert_eq!(
            StatusCode::InternalServerError.reason_phrase(),
            "Internal Server Error"
        );
    }

    #[test]
    fn test_http_response_to_bytes() {
        let response = HttpResponse::new(StatusCode::Ok)
            .with_content_type("text/plain")
            .with_body_string("Hello, world!");

        let bytes = response.to_bytes();
        let response_str = String::from_utf8_lossy(&bytes);

        assert!(response_str.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response_str.contains("Content-Type: text/plain\r\n"));
        assert!(response_str.contains("Content-Length: 13\r\n"));
        assert!(response_str.contains("Server: microroute-rs\r\n"));
        assert!(response_str.ends_with("\r\n\r\nHello, world!"));
    }

    #[test]
    fn test_http_response_with_json() {
        use serde::Serialize;

        #[derive(Serialize)]
        struct Payload {
            name: String,
        }

        let payload = Payload {
            name: "hello".to_string(),
        };
        let response = HttpResponse::new(StatusCode::Created)
            .with_json(&payload)
            .unwrap();

        assert_eq!(
            response.headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(response.body, br#"{"name":"hello"}"#);
        assert_eq!(response.headers.get("Content-Length"), Some(&"16".to_string()));
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.read_buffer_size, 8192);
    }
}
