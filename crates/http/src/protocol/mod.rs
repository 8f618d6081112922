//! Core request types and the parsing state machine.
//!
//! # Architecture
//!
//! The protocol module is organized leaf-first:
//!
//! - **Header Collection** ([`header`]): [`Headers`] stores fields under lower-cased names
//!   and parses one field-line per call
//! - **Request-Line** ([`request_line`]): [`RequestLine::parse`] reads the first line of a
//!   request into method, target and version
//! - **Request** ([`request`]): [`Request`] owns the parse state and drives the two parsers
//!   above through [`Request::advance`]
//! - **Error Handling** ([`error`]): [`ParseError`] covers every way a parse can fail
//!
//! Nothing here performs I/O. The drivers in [`crate::connection`] read from a byte source
//! and hand the buffered bytes to [`Request::advance`].
//!
//! # Example
//!
//! ```
//! use http_head_parser::protocol::Request;
//!
//! let mut request = Request::new();
//! let consumed = request.advance(b"GET / HTTP/1.1\r\nHost: loc").unwrap();
//! assert_eq!(consumed, 16);
//!
//! request.advance(b"Host: localhost\r\n\r\n").unwrap();
//! assert!(request.is_done());
//! assert_eq!(request.headers().get("host"), Some("localhost"));
//! ```

mod error;
pub use error::ParseError;

mod header;
pub use header::Headers;

mod request_line;
pub use request_line::RequestLine;

mod request;
pub use request::ParseState;
pub use request::Request;
