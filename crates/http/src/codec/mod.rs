//! Codec module for decoding HTTP request heads from a byte buffer
//!
//! This module bridges the [`Request`](crate::protocol::Request) state machine and the
//! [`tokio_util::codec`] framework.
//!
//! - [`RequestDecoder`]: decodes a request head out of a [`BytesMut`](bytes::BytesMut)
//!   buffer, removing the consumed bytes and leaving the rest for the next round
//!
//! # Example
//!
//! ```
//! use http_head_parser::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut request_buffer = BytesMut::from(&b"GET / HTTP/1.1\r\n\r\n"[..]);
//! let request = decoder.decode(&mut request_buffer).unwrap();
//! assert!(request.is_some());
//! ```

mod request_decoder;

pub use request_decoder::RequestDecoder;
