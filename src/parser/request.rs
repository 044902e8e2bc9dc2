//! Request decoding and representation.

use std::collections::HashMap;

use log::debug;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::parser::error::Error;

/// A single request decoded from a connection.
///
/// The method and path are kept as plain strings: the router matches paths by
/// exact equality and never looks at the method, so neither token is
/// validated. The protocol-version token is consumed during parsing but not
/// retained.
#[derive(Debug, Clone)]
pub struct Request {
    /// The method token from the request line (not validated)
    pub method: String,
    /// The path token from the request line
    pub path: String,
    /// The headers, keyed exactly as they appeared on the wire
    pub headers: HashMap<String, String>,
    /// The request body; empty unless a `Content-Length` header was supplied
    pub body: Vec<u8>,
}

impl Request {
    /// Create a request from already-decoded components.
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        headers: HashMap<String, String>,
        body: Vec<u8>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers,
            body,
        }
    }

    /// Get a header value by name (case-insensitive).
    ///
    /// Header keys are stored exactly as received; this helper scans for a
    /// case-insensitive match for callers that don't care about the wire
    /// spelling.
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                Some(v)
            } else {
                None
            }
        })
    }

    /// Check if a header exists (case-insensitive).
    pub fn has_header(&self, name: &str) -> bool {
        self.get_header(name).is_some()
    }

    /// Parse the request body as JSON.
    ///
    /// Fails unless the `Content-Type` header says `application/json`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        if !self.is_json() {
            let content_type = self
                .get_header("Content-Type")
                .cloned()
                .unwrap_or_else(|| "none".to_string());
            return Err(Error::UnexpectedContentType(content_type));
        }

        let value = serde_json::from_slice(&self.body)?;
        Ok(value)
    }

    /// Check if the request declares a JSON body.
    pub fn is_json(&self) -> bool {
        self.get_header("Content-Type")
            .map(|ct| ct.starts_with("application/json"))
            .unwrap_or(false)
    }
}

/// Decode one request from a buffered byte stream.
///
/// The wire format consumed is a request line `<METHOD> <PATH> <VERSION>\n`,
/// zero or more `<Name>: <Value>\n` header lines, the literal terminator
/// `\r\n`, then optionally `Content-Length` raw bytes of body.
///
/// Several quirks of this format are deliberate and load-bearing:
///
/// - Lines are read up to `\n` (a preceding `\r` is tolerated), but the end
///   of the header block is matched as the exact two-byte sequence `\r\n`. A
///   header block terminated by a bare `\n\n` only ends when the stream does.
/// - A line truncated by EOF is incomplete: for the request line that is an
///   error, for a header line the partial data is dropped and the header
///   block ends.
/// - Duplicate header names: the last occurrence wins.
/// - The body is filled by a single read whose returned count is never
///   checked, so a short read leaves the tail of the declared-length buffer
///   zero-filled. A `Content-Length` value that fails integer parsing counts
///   as zero rather than an error.
///
/// # Examples
///
/// ```
/// use microroute_rs::parse_request;
/// use tokio::io::BufReader;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let wire = b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n";
/// let mut reader = BufReader::new(&wire[..]);
///
/// let request = parse_request(&mut reader).await.unwrap();
/// assert_eq!(request.method, "GET");
/// assert_eq!(request.path, "/index.html");
/// assert_eq!(request.headers.get("Host"), Some(&"example.com".to_string()));
/// assert!(request.body.is_empty());
/// # }
/// ```
pub async fn parse_request<R>(reader: &mut R) -> Result<Request, Error>
where
    R: AsyncBufRead + Unpin,
{
    // Read the request line
    let mut line = Vec::new();
    reader
        .read_until(b'\n', &mut line)
        .await
        .map_err(Error::RequestLineError)?;
    if !line.ends_with(b"\n") {
        // EOF before the terminator: the line is incomplete, and an empty
        // stream lands here too. Treated like a failed read.
        return Err(Error::RequestLineError(
            std::io::ErrorKind::UnexpectedEof.into(),
        ));
    }

    // Split the request line into method, path, and version
    let request_line = String::from_utf8_lossy(&line);
    let parts: Vec<&str> = request_line.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(Error::MalformedRequestLine(
            request_line.trim_end().to_string(),
        ));
    }

    let method = parts[0].to_string();
    let path = parts[1].to_string();
    // parts[2] is the protocol version; it is read but never validated.

    // Read the headers until the literal CRLF terminator. EOF or a read
    // error also ends the header block, without being an error.
    let mut headers = HashMap::new();
    loop {
        let mut line = Vec::new();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        if !line.ends_with(b"\n") {
            // A trailing line truncated by EOF is dropped, not inserted.
            break;
        }
        if line == b"\r\n" {
            break;
        }

        // Split on the first colon only; lines without one are skipped.
        let text = String::from_utf8_lossy(&line);
        if let Some((name, value)) = text.split_once(':') {
            // Unconditional insert: duplicate names, last write wins.
            headers.insert(name.trim().to_string(), value.trim().to_string());
        }
    }

    // Read the body if a content length is specified. The lookup is
    // exact-case, and an unparseable value counts as zero.
    let mut body = Vec::new();
    if let Some(raw) = headers.get("Content-Length") {
        let declared: usize = raw.parse().unwrap_or(0);
        let mut buf = vec![0u8; declared];
        // A single read; the returned count is not checked, so after a
        // short read the tail of the buffer stays zero-filled.
        let _ = reader.read(&mut buf).await.map_err(Error::BodyReadError)?;
        body = buf;
    }

    debug!("Received request: {method} {path}");
    debug!("Headers: {headers:?}");
    debug!("Body: {len} bytes", len = body.len());

    Ok(Request {
        method,
        path,
        headers,
        body,
    })
}
