//! Error types for the request parser.

use thiserror::Error;

/// Errors that can occur while decoding a request from a connection.
///
/// Each of these terminates processing for the connection it occurred on;
/// none of them produce a response on the wire.
#[derive(Debug, Error)]
pub enum Error {
    /// The request line did not split into exactly three tokens.
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),

    /// I/O failure while reading the request line.
    #[error("Error reading request line: {0}")]
    RequestLineError(#[source] std::io::Error),

    /// I/O failure while reading the declared request body.
    #[error("Error reading body: {0}")]
    BodyReadError(#[source] std::io::Error),

    /// The body was asked for as JSON but the request doesn't declare one.
    #[error("Unexpected Content-Type: {0}")]
    UnexpectedContentType(String),

    /// Error parsing a JSON body.
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}
