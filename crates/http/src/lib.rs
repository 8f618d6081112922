//! An incremental HTTP/1.1 request-head parser
//!
//! This crate reconstructs the request-line and header fields of an HTTP/1.1 request from
//! a byte source that may deliver the message in fragments of any size. Nothing needs to be
//! buffered up front: bytes are parsed as they arrive, and a partial line simply waits for
//! the next read.
//!
//! # Features
//!
//! - Line-at-a-time parsing that is independent of read boundaries
//! - Sticky error state: a malformed message is never interpreted further
//! - Blocking driver over [`std::io::Read`] and async driver over [`tokio::io::AsyncRead`]
//! - [`tokio_util::codec::Decoder`] implementation for custom framing
//! - Read buffer that doubles when a single line does not fit, with an optional size cap
//! - Configurable handling of a source that ends mid request
//!
//! # Example
//!
//! ```
//! use http_head_parser::parse_from;
//!
//! let src = &b"GET /coffee HTTP/1.1\r\nHost: localhost:42069\r\nAccept: */*\r\n\r\n"[..];
//! let request = parse_from(src).unwrap();
//!
//! let line = request.request_line().unwrap();
//! assert_eq!(line.method(), "GET");
//! assert_eq!(line.target(), Ok("/coffee"));
//! assert_eq!(line.version(), "1.1");
//! assert_eq!(request.headers().get("Accept"), Some("*/*"));
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`protocol`]: request types, the header collection and the parsing state machine
//! - [`codec`]: the [`tokio_util`] decoder wrapping the state machine
//! - [`connection`]: drivers that read from a byte source and feed the decoder
//! - [`config`]: settings shared by the drivers
//!
//! # Error Handling
//!
//! Every failure is a [`protocol::ParseError`]. Parse errors are fatal to the request being
//! read; I/O errors from the byte source are carried unchanged in [`protocol::ParseError::Io`].
//!
//! # Limitations
//!
//! - HTTP/1.1 only, other versions are rejected
//! - Request bodies are not read; bytes after the header section stay buffered
//! - One request per driver call, no keep-alive or pipelining handling

pub mod codec;
pub mod config;
pub mod connection;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;

pub use config::{EofPolicy, ParserConfig};
pub use connection::parse_from;
