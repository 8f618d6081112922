//! Drivers that read request heads from a byte source
//!
//! This module connects a byte source of unknown chunking to the request parser. The
//! parser never assumes that line boundaries line up with read boundaries: each driver
//! keeps unconsumed bytes buffered and hands them back to the parser together with the
//! next read.
//!
//! # Components
//!
//! - [`RequestReader`] / [`parse_from`]: blocking driver over [`std::io::Read`]
//!   - Starts with a small read window and doubles it whenever a line does not fit
//!   - Retries interrupted reads, propagates every other I/O error
//! - [`HttpConnection`]: async driver over [`tokio::io::AsyncRead`]
//!   - Built on [`FramedRead`](tokio_util::codec::FramedRead) and
//!     [`RequestDecoder`](crate::codec::RequestDecoder)
//!
//! Each driver owns its buffer and its request. Running one driver per connection, on
//! separate threads or tasks, needs no synchronization.

mod http_connection;
mod request_reader;

pub use http_connection::HttpConnection;
pub use request_reader::RequestReader;
pub use request_reader::parse_from;
