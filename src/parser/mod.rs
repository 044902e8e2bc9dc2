//! Request parser module.
//!
//! This module decodes a single HTTP-like request from a raw byte stream:
//! request line, headers, and an optional `Content-Length`-delimited body.

mod error;
mod request;

// Re-export public items
pub use error::Error;
pub use request::Request;

// Re-export the parse_request function
pub use request::parse_request;
